use common::pagination::Paging;
use yew::prelude::*;

use super::helpers::{format_count, select_value};

#[derive(Properties, PartialEq)]
pub struct PagerProps {
    pub paging: Paging,
    pub total: u64,
    pub page_sizes: Vec<u32>,
    pub on_change: Callback<Paging>,
}

/// `start–end / total` indicator with previous/next buttons and a page size
/// picker.
#[function_component(Pager)]
pub fn pager(props: &PagerProps) -> Html {
    let paging = props.paging;
    let range = paging.range(props.total);
    let pages = paging.page_count(props.total);

    let previous = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(paging.with_page(paging.page - 1)))
    };
    let next = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(paging.with_page(paging.page + 1)))
    };
    let resize = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            if let Ok(size) = select_value(&e).parse::<u32>() {
                on_change.emit(paging.with_size(size));
            }
        })
    };

    html! {
        <div class="pager">
            <span class="pager-range">
                { format!("{}–{} / {}", format_count(range.start), format_count(range.end), format_count(range.total)) }
            </span>
            <button class="icon-btn" title="Previous page" disabled={!paging.has_previous()} onclick={previous}>
                <i class="material-icons">{"chevron_left"}</i>
            </button>
            <span class="pager-page">{ format!("{} / {}", paging.page, pages) }</span>
            <button class="icon-btn" title="Next page" disabled={!paging.has_next(props.total)} onclick={next}>
                <i class="material-icons">{"chevron_right"}</i>
            </button>
            <select class="pager-size" onchange={resize}>
                { for props.page_sizes.iter().map(|size| html! {
                    <option value={size.to_string()} selected={*size == paging.size}>{ size }</option>
                }) }
            </select>
        </div>
    }
}
