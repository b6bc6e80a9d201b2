//! Filter controls generated from a `filter-options` response.
//!
//! Every option becomes one control keyed by its query key: a date input for
//! `date` options, a select for options with items (multi-select when the
//! option allows several values) and a text input otherwise. Changes are
//! reported as a whole new [`FilterSelection`].

use common::model::search::{FilterOption, FilterType};
use common::search::FilterSelection;
use yew::prelude::*;

use super::helpers::{input_value, select_value, selected_values};

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
    pub options: Vec<FilterOption>,
    pub selection: FilterSelection,
    /// Keys rendered elsewhere, e.g. by a lazy search control.
    #[prop_or_default]
    pub exclude: Vec<String>,
    pub on_change: Callback<FilterSelection>,
}

#[function_component(FilterPanel)]
pub fn filter_panel(props: &FilterPanelProps) -> Html {
    let controls = props
        .options
        .iter()
        .filter(|option| !props.exclude.contains(&option.key))
        .map(|option| filter_control(option, &props.selection, &props.on_change))
        .collect::<Html>();

    let clear = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(FilterSelection::new()))
    };

    html! {
        <div class="filter-panel">
            { controls }
            <button class="text-btn" disabled={props.selection.is_empty()} onclick={clear}>
                {"Clear filters"}
            </button>
        </div>
    }
}

fn filter_control(
    option: &FilterOption,
    selection: &FilterSelection,
    on_change: &Callback<FilterSelection>,
) -> Html {
    let label = option.description.clone().unwrap_or_else(|| option.key.clone());
    let key = option.key.clone();
    let current = selection.clone();
    let on_change = on_change.clone();

    let control = match (&option.items, option.kind) {
        (_, FilterType::Date) => {
            let onchange = Callback::from(move |e: Event| {
                let mut next = current.clone();
                next.set(&key, [input_value(&e)]);
                on_change.emit(next);
            });
            html! {
                <input type="date" value={selection.first(&option.key).unwrap_or_default().to_string()} {onchange} />
            }
        }
        (Some(items), _) if option.multiple => {
            let onchange = Callback::from(move |e: Event| {
                let mut next = current.clone();
                next.set(&key, selected_values(&e));
                on_change.emit(next);
            });
            html! {
                <select multiple=true {onchange}>
                    { for items.iter().map(|item| {
                        let value = item.value.to_string();
                        html! {
                            <option selected={selection.contains(&option.key, &value)} value={value.clone()}>
                                { item.label.clone() }
                            </option>
                        }
                    }) }
                </select>
            }
        }
        (Some(items), _) => {
            let onchange = Callback::from(move |e: Event| {
                let mut next = current.clone();
                next.set(&key, [select_value(&e)]);
                on_change.emit(next);
            });
            html! {
                <select {onchange}>
                    <option value="" selected={selection.first(&option.key).is_none()}>{"All"}</option>
                    { for items.iter().map(|item| {
                        let value = item.value.to_string();
                        html! {
                            <option selected={selection.contains(&option.key, &value)} value={value.clone()}>
                                { item.label.clone() }
                            </option>
                        }
                    }) }
                </select>
            }
        }
        (None, _) => {
            let onchange = Callback::from(move |e: Event| {
                let mut next = current.clone();
                next.set(&key, [input_value(&e)]);
                on_change.emit(next);
            });
            html! {
                <input type="text" value={selection.first(&option.key).unwrap_or_default().to_string()} {onchange} />
            }
        }
    };

    html! {
        <label class="filter-control" key={option.key.clone()}>
            <span class="filter-label">{ label }</span>
            { control }
        </label>
    }
}
