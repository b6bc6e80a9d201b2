//! View of the bulk import wizard.
//!
//! One panel per step: the upload form, the validation progress and report
//! with the missing-user table, and the import progress and result. The
//! report table and its status filter are shared by validation and result.

use common::bulk::upload::accept_attribute;
use common::bulk::workflow::BulkStep;
use common::model::bulk::{CheckResult, HistorySummary, ResultSummary, RowStatus};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::BulkWizard;
use crate::components::helpers::{
    format_count, format_optional_timestamp, format_timestamp, select_value,
};
use crate::components::pager::Pager;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

const STEP_LABELS: [&str; 3] = ["Upload", "Validate", "Import"];

pub fn view(wizard: &BulkWizard, ctx: &Context<BulkWizard>) -> Html {
    let link = ctx.link();
    let step = wizard.workflow.step();

    let body = match step {
        BulkStep::Upload => upload_panel(wizard, link),
        BulkStep::Validating => progress_panel(wizard, ctx, "Validating the file…"),
        BulkStep::Validated => validation_panel(wizard, ctx),
        BulkStep::Executing | BulkStep::Completed => result_panel(wizard, ctx),
    };

    html! {
        <div class="bulk-root">
            { step_indicator(step) }
            { body }
            { confirm_sheet(wizard, link) }
        </div>
    }
}

fn step_indicator(step: BulkStep) -> Html {
    html! {
        <ol class="step-indicator">
            { for STEP_LABELS.iter().enumerate().map(|(index, label)| html! {
                <li class={classes!(
                    (index == step.index()).then_some("active"),
                    (index < step.index()).then_some("done"),
                )}>
                    { *label }
                </li>
            }) }
        </ol>
    }
}

fn upload_panel(wizard: &BulkWizard, link: &Scope<BulkWizard>) -> Html {
    let selected = wizard.workflow.repository_id().unwrap_or_default();

    html! {
        <section class="panel">
            <label class="field">
                <span>{"Repository"}</span>
                <select onchange={link.callback(|e: Event| Msg::SelectRepository(select_value(&e)))}>
                    <option value="" selected={selected.is_empty()}>{"Select a repository"}</option>
                    { for wizard.repositories.iter().map(|repository| html! {
                        <option value={repository.id.clone()} selected={repository.id == selected}>
                            { repository.label() }
                        </option>
                    }) }
                </select>
            </label>
            <label class="field">
                <span>{"User file (CSV, TSV or Excel)"}</span>
                <input type="file" accept={accept_attribute()} ref={wizard.file_input_ref.clone()} />
            </label>
            <button
                class="primary-btn"
                disabled={wizard.uploading}
                onclick={link.callback(|_| Msg::Upload)}
            >
                { if wizard.uploading { "Uploading…" } else { "Upload and validate" } }
            </button>
        </section>
    }
}

fn progress_panel(wizard: &BulkWizard, ctx: &Context<BulkWizard>, title: &str) -> Html {
    let max_attempts = ctx.props().config.max_poll_attempts;
    let detail = match &wizard.progress {
        Some(progress) => format!(
            "{} (check {} of {})",
            progress.status.label(),
            progress.attempt,
            max_attempts
        ),
        None => "Waiting for the server…".to_string(),
    };

    html! {
        <section class="panel progress">
            <div class="spinner" />
            <h3>{ title.to_string() }</h3>
            <p class="muted">{ detail }</p>
        </section>
    }
}

fn validation_panel(wizard: &BulkWizard, ctx: &Context<BulkWizard>) -> Html {
    let link = ctx.link();
    let Some(summary) = wizard.workflow.validation() else {
        return progress_panel(wizard, ctx, "Loading the validation report…");
    };
    let errors = summary.error_count();

    html! {
        <section class="panel">
            <h3>{"Validation report"}</h3>
            { summary_counts(&summary.summary) }
            { status_filter(wizard, link) }
            { report_table(&summary.results) }
            <Pager
                paging={wizard.report_paging}
                total={summary.summary.total_for(&wizard.status_filter)}
                page_sizes={ctx.props().config.page_sizes.clone()}
                on_change={link.callback(Msg::SetReportPage)}
            />
            { missing_users_table(wizard, ctx) }
            if errors > 0 {
                <p class="error">
                    { format!("{} row(s) contain errors. Fix the file and upload it again.", format_count(errors)) }
                </p>
            }
            <div class="actions">
                <button class="text-btn" onclick={link.callback(|_| Msg::Restart)}>{"Upload another file"}</button>
                <button
                    class="primary-btn"
                    disabled={!wizard.workflow.can_execute() || wizard.executing}
                    onclick={link.callback(|_| Msg::OpenConfirm)}
                >
                    {"Run import"}
                </button>
            </div>
        </section>
    }
}

fn missing_users_table(wizard: &BulkWizard, ctx: &Context<BulkWizard>) -> Html {
    let link = ctx.link();
    let users = wizard.workflow.missing_users();
    if users.is_empty() {
        return html! {};
    }
    let selection = wizard.workflow.selection();
    let all_selected = selection.all_selected(users);

    html! {
        <div class="missing-users">
            <h4>{"Repository members missing from the file"}</h4>
            <p class="muted">{"Selected users are removed from the repository by the import."}</p>
            <div class="actions">
                <button class="text-btn" disabled={all_selected} onclick={link.callback(|_| Msg::SelectAllUsers)}>
                    {"Select all"}
                </button>
                <button class="text-btn" disabled={selection.selected_ids().is_empty()} onclick={link.callback(|_| Msg::DeselectAllUsers)}>
                    {"Deselect all"}
                </button>
            </div>
            <table class="data-table">
                <thead>
                    <tr>
                        <th />
                        <th>{"ID"}</th>
                        <th>{"Name"}</th>
                        <th>{"ePPN"}</th>
                        <th>{"Email"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for wizard.missing_page().iter().map(|user| {
                        let id = user.id.clone();
                        html! {
                            <tr key={user.id.clone()}>
                                <td>
                                    <input
                                        type="checkbox"
                                        checked={selection.is_selected(&user.id)}
                                        onchange={link.callback(move |_: Event| Msg::ToggleUser(id.clone()))}
                                    />
                                </td>
                                <td>{ user.id.clone() }</td>
                                <td>{ user.user_name.clone() }</td>
                                <td>{ user.first_eppn().unwrap_or("-").to_string() }</td>
                                <td>{ user.first_email().unwrap_or("-").to_string() }</td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
            <Pager
                paging={wizard.missing_paging}
                total={users.len() as u64}
                page_sizes={ctx.props().config.page_sizes.clone()}
                on_change={link.callback(Msg::SetMissingPage)}
            />
        </div>
    }
}

fn result_panel(wizard: &BulkWizard, ctx: &Context<BulkWizard>) -> Html {
    let link = ctx.link();
    let completed = wizard.workflow.step() == BulkStep::Completed;
    let progress = if completed {
        html! {}
    } else {
        progress_panel(wizard, ctx, "Importing users…")
    };

    html! {
        <>
            { progress }
            if let Some(result) = &wizard.result {
                { result_details(wizard, ctx, result) }
            }
            if completed {
                <div class="actions">
                    <button class="primary-btn" onclick={link.callback(|_| Msg::Restart)}>
                        {"Import another file"}
                    </button>
                </div>
            }
        </>
    }
}

fn result_details(wizard: &BulkWizard, ctx: &Context<BulkWizard>, result: &ResultSummary) -> Html {
    let link = ctx.link();
    let file_id = result.file_id;

    html! {
        <section class="panel">
            <h3>{"Import result"}</h3>
            <dl class="result-meta">
                <dt>{"File"}</dt>
                <dd>
                    <a href="#" onclick={link.callback(move |e: MouseEvent| {
                        e.prevent_default();
                        Msg::Download(file_id)
                    })}>
                        { result.file_name.clone() }
                    </a>
                </dd>
                <dt>{"Operator"}</dt>
                <dd>{ result.operator.clone() }</dd>
                <dt>{"Started"}</dt>
                <dd>{ format_timestamp(&result.start_timestamp) }</dd>
                <dt>{"Finished"}</dt>
                <dd>{ format_optional_timestamp(result.end_timestamp.as_ref()) }</dd>
            </dl>
            { summary_counts(&result.summary) }
            { status_filter(wizard, link) }
            { report_table(&result.results) }
            <Pager
                paging={wizard.report_paging}
                total={result.filtered_total(&wizard.status_filter)}
                page_sizes={ctx.props().config.page_sizes.clone()}
                on_change={link.callback(Msg::SetReportPage)}
            />
        </section>
    }
}

fn summary_counts(summary: &HistorySummary) -> Html {
    html! {
        <ul class="summary-counts">
            { for RowStatus::ALL.iter().map(|status| html! {
                <li class={classes!("count", status.label().to_lowercase())}>
                    <span class="count-label">{ status.label() }</span>
                    <span class="count-value">{ format_count(summary.count(*status)) }</span>
                </li>
            }) }
            <li class="count total">
                <span class="count-label">{"Total"}</span>
                <span class="count-value">{ format_count(summary.total()) }</span>
            </li>
        </ul>
    }
}

fn status_filter(wizard: &BulkWizard, link: &Scope<BulkWizard>) -> Html {
    html! {
        <div class="status-filter">
            { for RowStatus::ALL.iter().map(|status| {
                let status = *status;
                html! {
                    <label>
                        <input
                            type="checkbox"
                            checked={wizard.status_filter.contains(&status)}
                            onchange={link.callback(move |_: Event| Msg::ToggleStatusFilter(status))}
                        />
                        { status.label() }
                    </label>
                }
            }) }
        </div>
    }
}

fn report_table(rows: &[CheckResult]) -> Html {
    html! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>{"Status"}</th>
                    <th>{"ID"}</th>
                    <th>{"Name"}</th>
                    <th>{"ePPN"}</th>
                    <th>{"Email"}</th>
                    <th>{"Groups"}</th>
                    <th>{"Code"}</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|row| html! {
                    <tr class={row.status.label().to_lowercase()}>
                        <td>{ row.status.label() }</td>
                        <td>{ row.id.clone().unwrap_or_else(|| "-".to_string()) }</td>
                        <td>{ row.user_name.clone() }</td>
                        <td>{ row.eppn.join(", ") }</td>
                        <td>{ row.email.join(", ") }</td>
                        <td>{ row.groups.join(", ") }</td>
                        <td>{ row.code.clone().unwrap_or_default() }</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

fn confirm_sheet(wizard: &BulkWizard, link: &Scope<BulkWizard>) -> Html {
    let deleting = wizard.workflow.selection().selected_ids().len();

    html! {
        <YwMaterialTopSheet
            open={wizard.confirm_open}
            title={"Run the import?"}
            on_close={link.callback(|_| Msg::CloseConfirm)}
        >
            <p>{"The users in the file are created or updated in the selected repository."}</p>
            if deleting > 0 {
                <p class="error">
                    { format!("{} missing user(s) will be removed from the repository.", format_count(deleting as u64)) }
                </p>
            }
            <div class="actions">
                <button class="text-btn" onclick={link.callback(|_| Msg::CloseConfirm)}>{"Cancel"}</button>
                <button class="primary-btn" onclick={link.callback(|_| Msg::Execute)}>{"Run import"}</button>
            </div>
        </YwMaterialTopSheet>
    }
}
