use common::errors::ApiError;
use common::model::repository::{RepositoryDetail, RepositorySummary};
use common::model::search::SearchResult;
use common::pagination::Paging;
use common::requests::RepositoriesQuery;
use common::search::RequestTicket;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{list_field, list_toolbar, text_field, ListControls, ResourceProps};
use crate::api::resources::repositories as api;
use crate::components::helpers::{confirm, input_checked, report_api_error, show_toast, split_list};
use crate::components::pager::Pager;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

const SORT_KEYS: [(&str, &str); 3] = [
    ("displayName", "Name"),
    ("id", "ID"),
    ("serviceUrl", "Service URL"),
];

/// Edit form of one repository; `id` is `None` while creating.
#[derive(Default, Clone)]
struct RepositoryForm {
    id: Option<String>,
    display_name: String,
    service_url: String,
    entity_ids: String,
    suspended: bool,
}

impl RepositoryForm {
    fn from_detail(detail: RepositoryDetail) -> Self {
        Self {
            id: Some(detail.id),
            display_name: detail.display_name,
            service_url: detail.service_url.unwrap_or_default(),
            entity_ids: detail.entity_ids.unwrap_or_default().join("\n"),
            suspended: detail.suspended.unwrap_or(false),
        }
    }

    fn to_detail(&self) -> RepositoryDetail {
        let service_url = self.service_url.trim();
        RepositoryDetail {
            id: self.id.clone().unwrap_or_default(),
            display_name: self.display_name.trim().to_string(),
            service_url: (!service_url.is_empty()).then(|| service_url.to_string()),
            suspended: Some(self.suspended),
            entity_ids: Some(split_list(&self.entity_ids)),
            ..RepositoryDetail::default()
        }
    }
}

pub enum Msg {
    Search(String),
    Sort(String),
    SetPaging(Paging),
    Loaded {
        ticket: RequestTicket,
        result: Result<SearchResult<RepositorySummary>, ApiError>,
    },
    New,
    Edit(String),
    DetailLoaded(Result<RepositoryDetail, ApiError>),
    SetName(String),
    SetServiceUrl(String),
    SetEntityIds(String),
    SetSuspended(bool),
    Save,
    Saved(Result<RepositoryDetail, ApiError>),
    CloseForm,
    Delete(String),
    Deleted(Result<(), ApiError>),
}

pub struct RepositoryList {
    controls: ListControls,
    found: Option<SearchResult<RepositorySummary>>,
    form: Option<RepositoryForm>,
    saving: bool,
}

impl RepositoryList {
    fn load(&mut self, ctx: &Context<Self>) {
        let query = RepositoriesQuery {
            search: self.controls.search_term(),
            sort_key: Some(self.controls.sort_key.clone()),
            direction: Some(self.controls.direction),
            paging: Some(self.controls.paging),
        };
        let ticket = self.controls.issue();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::list(&query).await;
            link.send_message(Msg::Loaded { ticket, result });
        });
    }
}

impl Component for RepositoryList {
    type Message = Msg;
    type Properties = ResourceProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut list = Self {
            controls: ListControls::new(&ctx.props().config, "displayName"),
            found: None,
            form: None,
            saving: false,
        };
        list.load(ctx);
        list
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let login_url = ctx.props().config.login_url.clone();
        match msg {
            Msg::Search(term) => {
                self.controls.set_search(term);
                self.load(ctx);
                true
            }
            Msg::Sort(key) => {
                self.controls.set_sort(key);
                self.load(ctx);
                true
            }
            Msg::SetPaging(paging) => {
                self.controls.paging = paging;
                self.load(ctx);
                true
            }
            Msg::Loaded { ticket, result } => {
                if !self.controls.accepts(&ticket) {
                    return false;
                }
                match result {
                    Ok(found) => self.found = Some(found),
                    Err(err) => report_api_error(&err, &login_url),
                }
                true
            }
            Msg::New => {
                self.form = Some(RepositoryForm::default());
                true
            }
            Msg::Edit(id) => {
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::DetailLoaded(api::get(&id).await));
                });
                false
            }
            Msg::DetailLoaded(Ok(detail)) => {
                self.form = Some(RepositoryForm::from_detail(detail));
                true
            }
            Msg::DetailLoaded(Err(err)) => {
                report_api_error(&err, &login_url);
                false
            }
            Msg::SetName(value) => {
                if let Some(form) = &mut self.form {
                    form.display_name = value;
                }
                false
            }
            Msg::SetServiceUrl(value) => {
                if let Some(form) = &mut self.form {
                    form.service_url = value;
                }
                false
            }
            Msg::SetEntityIds(value) => {
                if let Some(form) = &mut self.form {
                    form.entity_ids = value;
                }
                false
            }
            Msg::SetSuspended(value) => {
                if let Some(form) = &mut self.form {
                    form.suspended = value;
                }
                true
            }
            Msg::Save => {
                let Some(form) = &self.form else {
                    return false;
                };
                if self.saving {
                    return false;
                }
                let detail = form.to_detail();
                if detail.display_name.is_empty() {
                    show_toast("Please enter a name.");
                    return false;
                }
                let creating = form.id.is_none();
                self.saving = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = if creating {
                        api::create(&detail).await
                    } else {
                        api::update(&detail).await
                    };
                    link.send_message(Msg::Saved(result));
                });
                true
            }
            Msg::Saved(result) => {
                self.saving = false;
                match result {
                    Ok(detail) => {
                        show_toast(&format!("Saved {}.", detail.display_name));
                        self.form = None;
                        self.load(ctx);
                    }
                    Err(err) => report_api_error(&err, &login_url),
                }
                true
            }
            Msg::CloseForm => {
                self.form = None;
                true
            }
            Msg::Delete(id) => {
                if !confirm(&format!("Delete repository {id}?")) {
                    return false;
                }
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Deleted(api::delete(&id).await));
                });
                false
            }
            Msg::Deleted(result) => {
                match result {
                    Ok(()) => {
                        show_toast("Repository deleted.");
                        self.load(ctx);
                    }
                    Err(err) => report_api_error(&err, &login_url),
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let rows = self
            .found
            .as_ref()
            .map(|found| found.resources.as_slice())
            .unwrap_or_default();
        let total = self.found.as_ref().map_or(0, |found| found.total);

        html! {
            <div class="resource-root">
                { list_toolbar(
                    &self.controls,
                    &SORT_KEYS,
                    link.callback(Msg::Search),
                    link.callback(Msg::Sort),
                    Some(link.callback(|_| Msg::New)),
                ) }
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>{"ID"}</th>
                            <th>{"Name"}</th>
                            <th>{"Service URL"}</th>
                            <th />
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|repository| {
                            let edit_id = repository.id.clone();
                            let delete_id = repository.id.clone();
                            html! {
                                <tr key={repository.id.clone()}>
                                    <td>{ repository.id.clone() }</td>
                                    <td>{ repository.label() }</td>
                                    <td>{ repository.service_url.clone().unwrap_or_default() }</td>
                                    <td class="row-actions">
                                        <button class="icon-btn" title="Edit" onclick={link.callback(move |_| Msg::Edit(edit_id.clone()))}>
                                            <i class="material-icons">{"edit"}</i>
                                        </button>
                                        <button class="icon-btn" title="Delete" onclick={link.callback(move |_| Msg::Delete(delete_id.clone()))}>
                                            <i class="material-icons">{"delete"}</i>
                                        </button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
                <Pager
                    paging={self.controls.paging}
                    {total}
                    page_sizes={ctx.props().config.page_sizes.clone()}
                    on_change={link.callback(Msg::SetPaging)}
                />
                { self.form_sheet(ctx) }
            </div>
        }
    }
}

impl RepositoryList {
    fn form_sheet(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let form = self.form.clone().unwrap_or_default();
        let title = if form.id.is_some() { "Edit repository" } else { "New repository" };

        html! {
            <YwMaterialTopSheet
                open={self.form.is_some()}
                title={title}
                on_close={link.callback(|_| Msg::CloseForm)}
            >
                if let Some(id) = &form.id {
                    <p class="muted">{ format!("ID {id}") }</p>
                }
                { text_field("Name", &form.display_name, true, link.callback(Msg::SetName)) }
                { text_field("Service URL", &form.service_url, false, link.callback(Msg::SetServiceUrl)) }
                { list_field("Entity IDs (one per line)", &form.entity_ids, link.callback(Msg::SetEntityIds)) }
                <label class="field inline">
                    <input
                        type="checkbox"
                        checked={form.suspended}
                        onchange={link.callback(|e: Event| Msg::SetSuspended(input_checked(&e)))}
                    />
                    <span>{"Suspended"}</span>
                </label>
                <div class="actions">
                    <button class="text-btn" onclick={link.callback(|_| Msg::CloseForm)}>{"Cancel"}</button>
                    <button class="primary-btn" disabled={self.saving} onclick={link.callback(|_| Msg::Save)}>
                        { if self.saving { "Saving…" } else { "Save" } }
                    </button>
                </div>
            </YwMaterialTopSheet>
        }
    }
}
