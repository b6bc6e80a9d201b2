//! Lazy, searchable picker for the operators of a history tab.
//!
//! The gateway does not report how many operators match, so pages are
//! loaded until one comes back short. Typing restarts the search after the
//! configured debounce delay; answers to superseded searches are dropped.

use common::errors::ApiError;
use common::model::history::HistoryTab;
use common::model::search::SearchResult;
use common::model::user::UserSummary;
use common::pagination::PageLoader;
use common::requests::OperatorQuery;
use common::search::{LatestRequest, RequestTicket};
use gloo_timers::callback::Timeout;
use web_sys::Element;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{input_value, report_api_error};
use crate::api;

/// Distance from the bottom of the list, in pixels, that triggers the next
/// page.
const SCROLL_THRESHOLD: i32 = 24;

#[derive(Properties, PartialEq)]
pub struct OperatorSelectProps {
    pub tab: HistoryTab,
    pub selected: Vec<String>,
    pub page_size: u32,
    pub debounce_ms: u32,
    pub login_url: String,
    pub on_change: Callback<Vec<String>>,
}

pub enum Msg {
    Input(String),
    Search,
    LoadMore,
    Loaded {
        ticket: RequestTicket,
        result: Result<SearchResult<UserSummary>, ApiError>,
    },
    Toggle(String),
}

pub struct OperatorSelect {
    term: String,
    latest: LatestRequest,
    loader: PageLoader,
    options: Vec<UserSummary>,
    debounce: Option<Timeout>,
}

impl OperatorSelect {
    fn restart(&mut self, ctx: &Context<Self>) {
        self.debounce = None;
        self.loader = PageLoader::new(ctx.props().page_size);
        self.options.clear();
        self.fetch_next(ctx);
    }

    fn fetch_next(&mut self, ctx: &Context<Self>) {
        let Some(paging) = self.loader.begin() else {
            return;
        };
        let ticket = self.latest.issue(&self.term, paging.page);
        let query = OperatorQuery {
            search: Some(ticket.term().to_string()).filter(|term| !term.is_empty()),
            paging: Some(paging),
        };
        let tab = ctx.props().tab;
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::history::operators(tab, &query).await;
            link.send_message(Msg::Loaded { ticket, result });
        });
    }
}

impl Component for OperatorSelect {
    type Message = Msg;
    type Properties = OperatorSelectProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut select = Self {
            term: String::new(),
            latest: LatestRequest::new(),
            loader: PageLoader::new(ctx.props().page_size),
            options: Vec::new(),
            debounce: None,
        };
        select.fetch_next(ctx);
        select
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().tab != old_props.tab {
            self.term.clear();
            self.restart(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Input(term) => {
                self.term = term;
                let link = ctx.link().clone();
                // Replacing the timeout drops, and so cancels, the pending one.
                self.debounce = Some(Timeout::new(ctx.props().debounce_ms, move || {
                    link.send_message(Msg::Search)
                }));
                true
            }
            Msg::Search => {
                self.restart(ctx);
                true
            }
            Msg::LoadMore => {
                self.fetch_next(ctx);
                false
            }
            Msg::Loaded { ticket, result } => {
                if !self.latest.accepts(&ticket) {
                    return false;
                }
                match result {
                    Ok(found) => {
                        let received = found.resources.len();
                        if self.loader.complete_open_ended(ticket.page(), received) {
                            self.options.extend(found.resources);
                        }
                    }
                    Err(err) => {
                        self.loader.fail(ticket.page());
                        report_api_error(&err, &ctx.props().login_url);
                    }
                }
                true
            }
            Msg::Toggle(id) => {
                let mut selected = ctx.props().selected.clone();
                if let Some(index) = selected.iter().position(|current| *current == id) {
                    selected.remove(index);
                } else {
                    selected.push(id);
                }
                ctx.props().on_change.emit(selected);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let selected = &ctx.props().selected;

        let onscroll = link.batch_callback(|e: Event| {
            let list = e.target_unchecked_into::<Element>();
            let near_end =
                list.scroll_top() + list.client_height() >= list.scroll_height() - SCROLL_THRESHOLD;
            near_end.then_some(Msg::LoadMore)
        });

        html! {
            <div class="operator-select">
                <span class="filter-label">{"Operator"}</span>
                <input
                    type="search"
                    placeholder="Search operators"
                    value={self.term.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::Input(input_value(&e)))}
                />
                <ul class="operator-options" {onscroll}>
                    { for self.options.iter().map(|operator| {
                        let id = operator.id.clone();
                        html! {
                            <li key={operator.id.clone()}>
                                <label>
                                    <input
                                        type="checkbox"
                                        checked={selected.contains(&operator.id)}
                                        onchange={link.callback(move |_: Event| Msg::Toggle(id.clone()))}
                                    />
                                    { operator.label() }
                                </label>
                            </li>
                        }
                    }) }
                    if self.loader.is_pending() {
                        <li class="muted">{"Loading…"}</li>
                    } else if self.options.is_empty() {
                        <li class="muted">{"No operators found"}</li>
                    }
                </ul>
            </div>
        }
    }
}
