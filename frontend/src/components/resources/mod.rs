//! List and edit pages for repositories, groups and users.
//!
//! The three pages share [`ListControls`] for the search term, sort order
//! and paging, and the toolbar built by [`list_toolbar`].

use common::config::ClientConfig;
use common::pagination::Paging;
use common::requests::SortDirection;
use common::search::{LatestRequest, RequestTicket};
use std::rc::Rc;
use yew::prelude::*;

use super::helpers::{input_value, select_value};

pub mod groups;
pub mod repositories;
pub mod users;

#[derive(Properties, PartialEq, Clone)]
pub struct ResourceProps {
    pub config: Rc<ClientConfig>,
}

/// Search, sort and paging of a resource list.
pub struct ListControls {
    pub search: String,
    pub sort_key: String,
    pub direction: SortDirection,
    pub paging: Paging,
    latest: LatestRequest,
}

impl ListControls {
    pub fn new(config: &ClientConfig, sort_key: &str) -> Self {
        Self {
            search: String::new(),
            sort_key: sort_key.to_string(),
            direction: SortDirection::Asc,
            paging: Paging::first(config.default_page_size),
            latest: LatestRequest::new(),
        }
    }

    /// Ticket for a new list request; answers to older ones are ignored.
    pub fn issue(&mut self) -> RequestTicket {
        self.latest.issue(&self.search, self.paging.page)
    }

    pub fn accepts(&self, ticket: &RequestTicket) -> bool {
        self.latest.accepts(ticket)
    }

    pub fn search_term(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_string())
    }

    pub fn set_sort(&mut self, key: String) {
        if self.sort_key == key {
            self.direction = self.direction.toggled();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Asc;
        }
        self.paging = self.paging.with_page(1);
    }

    pub fn set_search(&mut self, term: String) {
        self.search = term;
        self.paging = self.paging.with_page(1);
    }
}

/// Search box, sort picker and a "new" button above a resource table.
pub fn list_toolbar(
    controls: &ListControls,
    sort_keys: &[(&'static str, &'static str)],
    on_search: Callback<String>,
    on_sort: Callback<String>,
    on_create: Option<Callback<MouseEvent>>,
) -> Html {
    let direction_icon = match controls.direction {
        SortDirection::Asc => "arrow_upward",
        SortDirection::Desc => "arrow_downward",
    };
    let current = controls.sort_key.clone();
    let resort = on_sort.clone();

    html! {
        <div class="table-toolbar">
            <input
                type="search"
                placeholder="Search"
                value={controls.search.clone()}
                onchange={on_search.reform(|e: Event| input_value(&e))}
            />
            <select onchange={on_sort.reform(|e: Event| select_value(&e))}>
                { for sort_keys.iter().map(|(key, label)| html! {
                    <option value={*key} selected={*key == controls.sort_key}>{ *label }</option>
                }) }
            </select>
            <button class="icon-btn" title="Reverse order" onclick={resort.reform(move |_| current.clone())}>
                <i class="material-icons">{ direction_icon }</i>
            </button>
            if let Some(on_create) = on_create {
                <button class="primary-btn" onclick={on_create}>
                    <i class="material-icons">{"add"}</i>
                    {"New"}
                </button>
            }
        </div>
    }
}

/// Labelled text input of an edit form.
pub fn text_field(label: &str, value: &str, required: bool, on_input: Callback<String>) -> Html {
    html! {
        <label class="field">
            <span>{ label.to_string() }</span>
            <input
                type="text"
                value={value.to_string()}
                required={required}
                oninput={on_input.reform(|e: InputEvent| input_value(&e))}
            />
        </label>
    }
}

/// Labelled textarea holding one value per line. The raw text is kept by the
/// form and split when it is submitted.
pub fn list_field(label: &str, value: &str, on_input: Callback<String>) -> Html {
    html! {
        <label class="field">
            <span>{ label.to_string() }</span>
            <textarea
                rows="3"
                value={value.to_string()}
                oninput={on_input.reform(|e: InputEvent| {
                    e.target_unchecked_into::<web_sys::HtmlTextAreaElement>().value()
                })}
            />
        </label>
    }
}
