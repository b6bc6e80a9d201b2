use common::errors::ApiError;
use common::model::group::GroupSummary;
use common::model::search::{FilterOption, SearchResult};
use common::model::user::{UserDetail, UserSummary, PREFERRED_LANGUAGES};
use common::pagination::Paging;
use common::requests::UsersQuery;
use common::search::{FilterSelection, RequestTicket};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{list_field, list_toolbar, text_field, ListControls, ResourceProps};
use crate::api::resources::users as api;
use crate::components::filter_panel::FilterPanel;
use crate::components::helpers::{
    format_optional_timestamp, report_api_error, select_value, show_toast, split_list,
};
use crate::components::pager::Pager;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

const SORT_KEYS: [(&str, &str); 3] = [
    ("userName", "User name"),
    ("id", "ID"),
    ("lastModified", "Last modified"),
];

#[derive(Default, Clone)]
struct UserForm {
    id: Option<String>,
    user_name: String,
    eppn: String,
    emails: String,
    preferred_language: String,
    groups: Vec<GroupSummary>,
}

impl UserForm {
    fn from_detail(detail: UserDetail) -> Self {
        Self {
            id: (!detail.id.is_empty()).then_some(detail.id),
            user_name: detail.user_name,
            eppn: detail.eppn.unwrap_or_default().join("\n"),
            emails: detail.emails.unwrap_or_default().join("\n"),
            preferred_language: detail.preferred_language.unwrap_or_default(),
            groups: detail.groups.unwrap_or_default(),
        }
    }

    fn to_detail(&self) -> UserDetail {
        UserDetail {
            id: self.id.clone().unwrap_or_default(),
            user_name: self.user_name.trim().to_string(),
            eppn: Some(split_list(&self.eppn)),
            emails: Some(split_list(&self.emails)),
            preferred_language: (!self.preferred_language.is_empty())
                .then(|| self.preferred_language.clone()),
            ..UserDetail::default()
        }
    }
}

pub enum Msg {
    Search(String),
    Sort(String),
    SetPaging(Paging),
    FilterOptionsLoaded(Result<Vec<FilterOption>, ApiError>),
    SetFilters(FilterSelection),
    Loaded {
        ticket: RequestTicket,
        result: Result<SearchResult<UserSummary>, ApiError>,
    },
    New,
    Edit(String),
    DetailLoaded(Result<UserDetail, ApiError>),
    SetUserName(String),
    SetEppn(String),
    SetEmails(String),
    SetLanguage(String),
    Save,
    Saved(Result<UserDetail, ApiError>),
    CloseForm,
}

pub struct UserList {
    controls: ListControls,
    filter_options: Vec<FilterOption>,
    filters: FilterSelection,
    found: Option<SearchResult<UserSummary>>,
    form: Option<UserForm>,
    saving: bool,
}

impl UserList {
    /// Requests the current page. A malformed date filter is reported and
    /// nothing is sent.
    fn load(&mut self, ctx: &Context<Self>) {
        let mut query = UsersQuery {
            search: self.controls.search_term(),
            sort_key: Some(self.controls.sort_key.clone()),
            direction: Some(self.controls.direction),
            paging: Some(self.controls.paging),
            ..UsersQuery::default()
        };
        if let Err(err) = query.apply_filters(&self.filters) {
            show_toast(&err.to_string());
            return;
        }
        let ticket = self.controls.issue();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::list(&query).await;
            link.send_message(Msg::Loaded { ticket, result });
        });
    }

    fn edit_form(&mut self, change: impl FnOnce(&mut UserForm)) -> bool {
        match &mut self.form {
            Some(form) => {
                change(form);
                true
            }
            None => false,
        }
    }
}

impl Component for UserList {
    type Message = Msg;
    type Properties = ResourceProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::FilterOptionsLoaded(api::filter_options().await));
        });

        let mut list = Self {
            controls: ListControls::new(&ctx.props().config, "userName"),
            filter_options: Vec::new(),
            filters: FilterSelection::new(),
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
            Msg::FilterOptionsLoaded(Ok(options)) => {
                self.filter_options = options;
                true
            }
            Msg::FilterOptionsLoaded(Err(err)) => {
                report_api_error(&err, &login_url);
                false
            }
            Msg::SetFilters(filters) => {
                self.filters = filters;
                self.controls.paging = self.controls.paging.with_page(1);
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
                self.form = Some(UserForm::default());
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
                self.form = Some(UserForm::from_detail(detail));
                true
            }
            Msg::DetailLoaded(Err(err)) => {
                report_api_error(&err, &login_url);
                false
            }
            Msg::SetUserName(value) => self.edit_form(|form| form.user_name = value),
            Msg::SetEppn(value) => self.edit_form(|form| form.eppn = value),
            Msg::SetEmails(value) => self.edit_form(|form| form.emails = value),
            Msg::SetLanguage(value) => self.edit_form(|form| form.preferred_language = value),
            Msg::Save => {
                let Some(form) = &self.form else {
                    return false;
                };
                if self.saving {
                    return false;
                }
                let detail = form.to_detail();
                if detail.user_name.is_empty() {
                    show_toast("Please enter a user name.");
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
                        show_toast(&format!("Saved {}.", detail.user_name));
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
                <FilterPanel
                    options={self.filter_options.clone()}
                    selection={self.filters.clone()}
                    on_change={link.callback(Msg::SetFilters)}
                />
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
                            <th>{"User name"}</th>
                            <th>{"Email"}</th>
                            <th>{"ePPN"}</th>
                            <th>{"Last modified"}</th>
                            <th />
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|user| {
                            let edit_id = user.id.clone();
                            html! {
                                <tr key={user.id.clone()}>
                                    <td>{ user.id.clone() }</td>
                                    <td>{ user.label().to_string() }</td>
                                    <td>{ user.email.clone().unwrap_or_default() }</td>
                                    <td>{ user.eppn.clone().unwrap_or_default() }</td>
                                    <td>{ format_optional_timestamp(user.last_modified.as_ref()) }</td>
                                    <td class="row-actions">
                                        <button class="icon-btn" title="Edit" onclick={link.callback(move |_| Msg::Edit(edit_id.clone()))}>
                                            <i class="material-icons">{"edit"}</i>
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

impl UserList {
    fn form_sheet(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let form = self.form.clone().unwrap_or_default();
        let title = if form.id.is_some() { "Edit user" } else { "New user" };
        let groups = form
            .groups
            .iter()
            .map(GroupSummary::label)
            .collect::<Vec<_>>()
            .join(", ");

        html! {
            <YwMaterialTopSheet
                open={self.form.is_some()}
                title={title}
                on_close={link.callback(|_| Msg::CloseForm)}
            >
                { text_field("User name", &form.user_name, true, link.callback(Msg::SetUserName)) }
                { list_field("ePPN (one per line)", &form.eppn, link.callback(Msg::SetEppn)) }
                { list_field("Emails (one per line)", &form.emails, link.callback(Msg::SetEmails)) }
                <label class="field">
                    <span>{"Preferred language"}</span>
                    <select onchange={link.callback(|e: Event| Msg::SetLanguage(select_value(&e)))}>
                        { for PREFERRED_LANGUAGES.iter().map(|language| html! {
                            <option value={*language} selected={*language == form.preferred_language}>
                                { if language.is_empty() { "Not set" } else { *language } }
                            </option>
                        }) }
                    </select>
                </label>
                if !groups.is_empty() {
                    <p class="muted">{ format!("Groups: {groups}") }</p>
                }
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
