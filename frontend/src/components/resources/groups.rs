use common::errors::ApiError;
use common::model::group::{
    DeleteGroupsRequest, GroupDetail, GroupPatchRequest, GroupRepository, GroupSummary, MemberOp,
    Visibility,
};
use common::model::search::{FilterOption, SearchResult};
use common::pagination::Paging;
use common::requests::GroupsQuery;
use common::search::{FilterSelection, RequestTicket};
use std::collections::BTreeSet;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{list_field, list_toolbar, text_field, ListControls, ResourceProps};
use crate::api::resources::groups as api;
use crate::components::filter_panel::FilterPanel;
use crate::components::helpers::{
    confirm, format_count, input_checked, report_api_error, select_value, show_toast, split_list,
};
use crate::components::pager::Pager;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

const SORT_KEYS: [(&str, &str); 3] = [
    ("displayName", "Name"),
    ("id", "ID"),
    ("usersCount", "Members"),
];

#[derive(Clone)]
struct GroupForm {
    id: Option<String>,
    user_defined_id: String,
    display_name: String,
    description: String,
    public: bool,
    visibility: Visibility,
    repository_id: String,
}

impl Default for GroupForm {
    fn default() -> Self {
        Self {
            id: None,
            user_defined_id: String::new(),
            display_name: String::new(),
            description: String::new(),
            public: false,
            visibility: Visibility::Private,
            repository_id: String::new(),
        }
    }
}

impl GroupForm {
    fn from_detail(detail: GroupDetail) -> Self {
        Self {
            id: detail.id,
            user_defined_id: detail.user_defined_id.unwrap_or_default(),
            display_name: detail.display_name.unwrap_or_default(),
            description: detail.description.unwrap_or_default(),
            public: detail.public.unwrap_or(false),
            visibility: detail.member_list_visibility.unwrap_or(Visibility::Private),
            repository_id: detail.repository.map(|repository| repository.id).unwrap_or_default(),
        }
    }

    fn to_detail(&self) -> GroupDetail {
        let non_empty = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        GroupDetail {
            id: self.id.clone(),
            user_defined_id: non_empty(&self.user_defined_id),
            display_name: non_empty(&self.display_name),
            description: non_empty(&self.description),
            public: Some(self.public),
            member_list_visibility: Some(self.visibility),
            repository: non_empty(&self.repository_id).map(|id| GroupRepository {
                id,
                service_name: None,
            }),
            ..GroupDetail::default()
        }
    }
}

/// Member editor of one group.
struct MemberForm {
    group: GroupSummary,
    user_ids: String,
}

pub enum Msg {
    Search(String),
    Sort(String),
    SetPaging(Paging),
    FilterOptionsLoaded(Result<Vec<FilterOption>, ApiError>),
    SetFilters(FilterSelection),
    Loaded {
        ticket: RequestTicket,
        result: Result<SearchResult<GroupSummary>, ApiError>,
    },
    ToggleSelected(String),
    ToggleAllSelected(bool),
    DeleteSelected,
    New,
    Edit(String),
    DetailLoaded(Result<GroupDetail, ApiError>),
    SetUserDefinedId(String),
    SetName(String),
    SetDescription(String),
    SetPublic(bool),
    SetVisibility(String),
    SetRepository(String),
    Save,
    Saved(Result<GroupDetail, ApiError>),
    CloseForm,
    Delete(String),
    Deleted(Result<(), ApiError>),
    OpenMembers(GroupSummary),
    SetMemberIds(String),
    PatchMembers(MemberOp),
    MembersPatched(Result<GroupDetail, ApiError>),
    CloseMembers,
}

pub struct GroupList {
    controls: ListControls,
    filter_options: Vec<FilterOption>,
    filters: FilterSelection,
    found: Option<SearchResult<GroupSummary>>,
    selected: BTreeSet<String>,
    form: Option<GroupForm>,
    members: Option<MemberForm>,
    saving: bool,
}

impl GroupList {
    fn load(&mut self, ctx: &Context<Self>) {
        let mut query = GroupsQuery {
            search: self.controls.search_term(),
            sort_key: Some(self.controls.sort_key.clone()),
            direction: Some(self.controls.direction),
            paging: Some(self.controls.paging),
            ..GroupsQuery::default()
        };
        query.apply_filters(&self.filters);
        let ticket = self.controls.issue();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::list(&query).await;
            link.send_message(Msg::Loaded { ticket, result });
        });
    }

    fn visible_ids(&self) -> Vec<String> {
        self.found
            .iter()
            .flat_map(|found| found.resources.iter().map(|group| group.id.clone()))
            .collect()
    }

    fn all_selected(&self) -> bool {
        let ids = self.visible_ids();
        !ids.is_empty() && ids.iter().all(|id| self.selected.contains(id))
    }
}

impl Component for GroupList {
    type Message = Msg;
    type Properties = ResourceProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::FilterOptionsLoaded(api::filter_options().await));
        });

        let mut list = Self {
            controls: ListControls::new(&ctx.props().config, "displayName"),
            filter_options: Vec::new(),
            filters: FilterSelection::new(),
            found: None,
            selected: BTreeSet::new(),
            form: None,
            members: None,
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
                    Ok(found) => {
                        self.selected.clear();
                        self.found = Some(found);
                    }
                    Err(err) => report_api_error(&err, &login_url),
                }
                true
            }
            Msg::ToggleSelected(id) => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
                true
            }
            Msg::ToggleAllSelected(checked) => {
                if checked {
                    self.selected.extend(self.visible_ids());
                } else {
                    self.selected.clear();
                }
                true
            }
            Msg::DeleteSelected => {
                if self.selected.is_empty() {
                    return false;
                }
                let count = self.selected.len();
                if !confirm(&format!("Delete {count} selected group(s)?")) {
                    return false;
                }
                let request = DeleteGroupsRequest {
                    group_ids: self.selected.iter().cloned().collect(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Deleted(api::delete_many(&request).await));
                });
                false
            }
            Msg::New => {
                self.form = Some(GroupForm::default());
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
                self.form = Some(GroupForm::from_detail(detail));
                true
            }
            Msg::DetailLoaded(Err(err)) => {
                report_api_error(&err, &login_url);
                false
            }
            Msg::SetUserDefinedId(value) => self.edit_form(|form| form.user_defined_id = value),
            Msg::SetName(value) => self.edit_form(|form| form.display_name = value),
            Msg::SetDescription(value) => self.edit_form(|form| form.description = value),
            Msg::SetPublic(value) => self.edit_form(|form| form.public = value),
            Msg::SetVisibility(label) => match Visibility::from_label(&label) {
                Some(visibility) => self.edit_form(|form| form.visibility = visibility),
                None => false,
            },
            Msg::SetRepository(value) => self.edit_form(|form| form.repository_id = value),
            Msg::Save => {
                let Some(form) = &self.form else {
                    return false;
                };
                if self.saving {
                    return false;
                }
                let detail = form.to_detail();
                if detail.display_name.is_none() {
                    show_toast("Please enter a name.");
                    return false;
                }
                let id = form.id.clone();
                self.saving = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match id {
                        Some(id) => api::update(&id, &detail).await,
                        None => api::create(&detail).await,
                    };
                    link.send_message(Msg::Saved(result));
                });
                true
            }
            Msg::Saved(result) => {
                self.saving = false;
                match result {
                    Ok(_) => {
                        show_toast("Group saved.");
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
                if !confirm(&format!("Delete group {id}?")) {
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
                        show_toast("Deleted.");
                        self.selected.clear();
                        self.load(ctx);
                    }
                    Err(err) => report_api_error(&err, &login_url),
                }
                true
            }
            Msg::OpenMembers(group) => {
                self.members = Some(MemberForm {
                    group,
                    user_ids: String::new(),
                });
                true
            }
            Msg::SetMemberIds(value) => {
                if let Some(members) = &mut self.members {
                    members.user_ids = value;
                }
                false
            }
            Msg::PatchMembers(op) => {
                let Some(members) = &self.members else {
                    return false;
                };
                if self.saving {
                    return false;
                }
                let user_ids = split_list(&members.user_ids);
                if user_ids.is_empty() {
                    show_toast("Please enter at least one user ID.");
                    return false;
                }
                let id = members.group.id.clone();
                let patch = GroupPatchRequest::members(op, user_ids);
                self.saving = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::MembersPatched(api::patch_members(&id, &patch).await));
                });
                true
            }
            Msg::MembersPatched(result) => {
                self.saving = false;
                match result {
                    Ok(detail) => {
                        let count = detail.users_count.unwrap_or_default();
                        show_toast(&format!("The group now has {} member(s).", format_count(count)));
                        self.members = None;
                        self.load(ctx);
                    }
                    Err(err) => report_api_error(&err, &login_url),
                }
                true
            }
            Msg::CloseMembers => {
                self.members = None;
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
                <div class="table-toolbar">
                    <button
                        class="text-btn"
                        disabled={self.selected.is_empty()}
                        onclick={link.callback(|_| Msg::DeleteSelected)}
                    >
                        { format!("Delete selected ({})", self.selected.len()) }
                    </button>
                </div>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>
                                <input
                                    type="checkbox"
                                    checked={self.all_selected()}
                                    onchange={link.callback(|e: Event| Msg::ToggleAllSelected(input_checked(&e)))}
                                />
                            </th>
                            <th>{"ID"}</th>
                            <th>{"Name"}</th>
                            <th>{"Public"}</th>
                            <th>{"Member list"}</th>
                            <th>{"Members"}</th>
                            <th />
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|group| self.row(link, group)) }
                    </tbody>
                </table>
                <Pager
                    paging={self.controls.paging}
                    {total}
                    page_sizes={ctx.props().config.page_sizes.clone()}
                    on_change={link.callback(Msg::SetPaging)}
                />
                { self.form_sheet(ctx) }
                { self.member_sheet(ctx) }
            </div>
        }
    }
}

impl GroupList {
    /// Applies `change` to the open form, if any.
    fn edit_form(&mut self, change: impl FnOnce(&mut GroupForm)) -> bool {
        match &mut self.form {
            Some(form) => {
                change(form);
                true
            }
            None => false,
        }
    }

    fn row(&self, link: &Scope<Self>, group: &GroupSummary) -> Html {
        let toggle_id = group.id.clone();
        let edit_id = group.id.clone();
        let delete_id = group.id.clone();
        let members = group.clone();

        html! {
            <tr key={group.id.clone()}>
                <td>
                    <input
                        type="checkbox"
                        checked={self.selected.contains(&group.id)}
                        onchange={link.callback(move |_: Event| Msg::ToggleSelected(toggle_id.clone()))}
                    />
                </td>
                <td>{ group.id.clone() }</td>
                <td>{ group.label().to_string() }</td>
                <td>{ if group.public.unwrap_or(false) { "Yes" } else { "No" } }</td>
                <td>{ group.member_list_visibility.map(Visibility::label).unwrap_or("-") }</td>
                <td>{ format_count(group.users_count.unwrap_or_default()) }</td>
                <td class="row-actions">
                    <button class="icon-btn" title="Members" onclick={link.callback(move |_| Msg::OpenMembers(members.clone()))}>
                        <i class="material-icons">{"group"}</i>
                    </button>
                    <button class="icon-btn" title="Edit" onclick={link.callback(move |_| Msg::Edit(edit_id.clone()))}>
                        <i class="material-icons">{"edit"}</i>
                    </button>
                    <button class="icon-btn" title="Delete" onclick={link.callback(move |_| Msg::Delete(delete_id.clone()))}>
                        <i class="material-icons">{"delete"}</i>
                    </button>
                </td>
            </tr>
        }
    }

    fn form_sheet(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let form = self.form.clone().unwrap_or_default();
        let title = if form.id.is_some() { "Edit group" } else { "New group" };

        html! {
            <YwMaterialTopSheet
                open={self.form.is_some()}
                title={title}
                on_close={link.callback(|_| Msg::CloseForm)}
            >
                if form.id.is_none() {
                    { text_field("Group ID (optional)", &form.user_defined_id, false, link.callback(Msg::SetUserDefinedId)) }
                }
                { text_field("Name", &form.display_name, true, link.callback(Msg::SetName)) }
                { list_field("Description", &form.description, link.callback(Msg::SetDescription)) }
                { text_field("Repository ID", &form.repository_id, false, link.callback(Msg::SetRepository)) }
                <label class="field inline">
                    <input
                        type="checkbox"
                        checked={form.public}
                        onchange={link.callback(|e: Event| Msg::SetPublic(input_checked(&e)))}
                    />
                    <span>{"Public"}</span>
                </label>
                <label class="field">
                    <span>{"Member list visibility"}</span>
                    <select onchange={link.callback(|e: Event| Msg::SetVisibility(select_value(&e)))}>
                        { for Visibility::ALL.into_iter().map(|visibility| html! {
                            <option value={visibility.label()} selected={visibility == form.visibility}>
                                { visibility.label() }
                            </option>
                        }) }
                    </select>
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

    fn member_sheet(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let (title, user_ids) = match &self.members {
            Some(members) => (
                format!("Members of {}", members.group.label()),
                members.user_ids.clone(),
            ),
            None => (String::new(), String::new()),
        };

        html! {
            <YwMaterialTopSheet
                open={self.members.is_some()}
                {title}
                on_close={link.callback(|_| Msg::CloseMembers)}
            >
                { list_field("User IDs (comma or line separated)", &user_ids, link.callback(Msg::SetMemberIds)) }
                <div class="actions">
                    <button class="text-btn" onclick={link.callback(|_| Msg::CloseMembers)}>{"Cancel"}</button>
                    <button class="text-btn" disabled={self.saving} onclick={link.callback(|_| Msg::PatchMembers(MemberOp::Remove))}>
                        {"Remove"}
                    </button>
                    <button class="primary-btn" disabled={self.saving} onclick={link.callback(|_| Msg::PatchMembers(MemberOp::Add))}>
                        {"Add"}
                    </button>
                </div>
            </YwMaterialTopSheet>
        }
    }
}
