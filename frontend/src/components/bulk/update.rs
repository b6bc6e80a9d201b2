//! Update function of the bulk import wizard.
//!
//! Every network answer is checked against the workflow before it is
//! applied: report pages carry the ticket they were requested with and are
//! dropped once a newer request or another task has taken over. Any error in the middle of a task abandons the file and returns
//! the wizard to the upload step with the repository still selected.

use common::bulk::upload::{validate_upload, UploadCandidate};
use common::bulk::workflow::BulkStep;
use common::config::ClientConfig;
use common::errors::{BulkError, BulkPhase};
use common::jobs::polling::{PollConfig, PollOutcome};
use gloo_console::{debug, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{
    candidate, load_missing_users, load_result, load_validation, picked_files, start_polling,
};
use super::messages::Msg;
use super::state::{BulkWizard, PollProgress};
use crate::api;
use crate::components::helpers::{download_file, report_api_error, report_bulk_error, show_toast};

pub fn update(wizard: &mut BulkWizard, ctx: &Context<BulkWizard>, msg: Msg) -> bool {
    let config = ctx.props().config.clone();
    let login_url = config.login_url.as_str();

    match msg {
        Msg::RepositoriesLoaded(Ok(found)) => {
            wizard.repositories = found.resources;
            true
        }
        Msg::RepositoriesLoaded(Err(err)) => {
            report_api_error(&err, login_url);
            false
        }
        Msg::SelectRepository(id) => {
            if let Err(err) = wizard.workflow.select_repository(Some(id)) {
                show_toast(&err.to_string());
            }
            true
        }
        Msg::Upload => {
            if wizard.uploading {
                return false;
            }
            let files = picked_files(&wizard.file_input_ref);
            let candidates: Vec<UploadCandidate> = files.iter().map(candidate).collect();
            if let Err(err) = validate_upload(
                wizard.workflow.repository_id(),
                &candidates,
                config.max_upload_size,
            ) {
                show_toast(&err.to_string());
                return false;
            }
            let (Some(file), Some(repository_id)) = (
                files.into_iter().next(),
                wizard.workflow.repository_id().map(str::to_string),
            ) else {
                return false;
            };

            wizard.uploading = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::bulk::upload(&file, &repository_id).await;
                link.send_message(Msg::Uploaded(result));
            });
            true
        }
        Msg::Uploaded(result) => {
            wizard.uploading = false;
            match result {
                Ok(body) => match wizard.workflow.upload_accepted(body) {
                    Ok(()) => {
                        if let Some(task_id) = wizard.workflow.task_id().map(str::to_string) {
                            start_polling(
                                wizard,
                                ctx.link(),
                                PollConfig::from(&*config),
                                BulkPhase::Validation,
                                task_id,
                            );
                        }
                    }
                    Err(err) => abandon(wizard, &config, &err.to_string()),
                },
                // Nothing was started; the operator retries the upload.
                Err(err) => report_api_error(&err, login_url),
            }
            true
        }
        Msg::PollTick {
            generation,
            phase,
            attempt,
            status,
        } => {
            if !wizard.is_current(generation) {
                return false;
            }
            wizard.progress = Some(PollProgress {
                phase,
                attempt,
                status,
            });
            if phase == BulkPhase::Execution {
                request_result(wizard, ctx);
            }
            true
        }
        Msg::PollFinished {
            generation,
            phase,
            outcome,
        } => {
            if !wizard.is_current(generation) {
                return false;
            }
            wizard.progress = None;
            match outcome {
                Ok(None) => {}
                Ok(Some(PollOutcome::Succeeded)) => poll_succeeded(wizard, ctx, &config, phase),
                Ok(Some(PollOutcome::Failed)) => {
                    fail_bulk(wizard, &config, BulkError::Failed { phase })
                }
                Ok(Some(PollOutcome::TimedOut)) => {
                    fail_bulk(wizard, &config, BulkError::Timeout { phase })
                }
                Err(err) => fail_bulk(wizard, &config, BulkError::Api(err)),
            }
            true
        }
        Msg::ValidationLoaded { ticket, result } => {
            if !wizard.workflow.accepts_validation(&ticket) {
                debug!(format!("stale validation report for task {}", ticket.term()));
                return false;
            }
            match result {
                Ok(summary) => {
                    if let Err(err) = wizard.workflow.validation_loaded(&ticket, summary) {
                        warn!(format!("validation report ignored: {err}"));
                        return false;
                    }
                }
                Err(err) if wizard.workflow.step() == BulkStep::Validating => {
                    fail_bulk(wizard, &config, BulkError::Api(err));
                }
                Err(err) => report_api_error(&err, login_url),
            }
            true
        }
        Msg::MissingUsersLoaded { task_id, result } => {
            if wizard.workflow.task_id() != Some(task_id.as_str()) {
                debug!(format!("stale missing users for task {task_id}"));
                return false;
            }
            match result {
                Ok(users) => {
                    if let Err(err) = wizard.workflow.missing_users_loaded(&task_id, users) {
                        warn!(format!("missing users ignored: {err}"));
                        return false;
                    }
                }
                Err(err) => fail_bulk(wizard, &config, BulkError::Api(err)),
            }
            true
        }
        Msg::ToggleStatusFilter(status) => {
            if let Some(index) = wizard.status_filter.iter().position(|s| *s == status) {
                wizard.status_filter.remove(index);
            } else {
                wizard.status_filter.push(status);
            }
            wizard.report_paging = wizard.report_paging.with_page(1);
            reload_report(wizard, ctx);
            true
        }
        Msg::SetReportPage(paging) => {
            wizard.report_paging = paging;
            reload_report(wizard, ctx);
            true
        }
        Msg::ToggleUser(id) => {
            wizard.workflow.toggle_user(&id);
            true
        }
        Msg::SelectAllUsers => {
            wizard.workflow.select_all_users();
            true
        }
        Msg::DeselectAllUsers => {
            wizard.workflow.deselect_all_users();
            true
        }
        Msg::SetMissingPage(paging) => {
            wizard.missing_paging = paging;
            true
        }
        Msg::OpenConfirm => {
            if !wizard.workflow.can_execute() {
                show_toast("The file contains errors. Fix them and upload it again.");
                return false;
            }
            wizard.confirm_open = true;
            true
        }
        Msg::CloseConfirm => {
            wizard.confirm_open = false;
            true
        }
        Msg::Execute => {
            wizard.confirm_open = false;
            if wizard.executing {
                return true;
            }
            match wizard.workflow.execute_request() {
                Ok(request) => {
                    wizard.executing = true;
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let result = api::bulk::execute(&request).await;
                        link.send_message(Msg::ExecuteStarted(result));
                    });
                }
                Err(err) => show_toast(&err.to_string()),
            }
            true
        }
        Msg::ExecuteStarted(Ok(body)) => {
            match wizard.workflow.execution_started(body) {
                Ok(()) => {
                    wizard.status_filter.clear();
                    wizard.report_paging = wizard.report_paging.with_page(1);
                    wizard.result = None;
                    if let Some(task_id) = wizard.workflow.execute_task_id().map(str::to_string) {
                        start_polling(
                            wizard,
                            ctx.link(),
                            PollConfig::from(&*config),
                            BulkPhase::Execution,
                            task_id,
                        );
                    }
                }
                Err(err) => abandon(wizard, &config, &err.to_string()),
            }
            true
        }
        Msg::ExecuteStarted(Err(err)) => {
            fail_bulk(wizard, &config, BulkError::Api(err));
            true
        }
        Msg::ResultLoaded { ticket, result } => {
            if !wizard.workflow.accepts_result(&ticket) {
                debug!(format!("stale import result for history {}", ticket.term()));
                return false;
            }
            match result {
                Ok(result) => {
                    wizard.result = Some(result);
                    true
                }
                Err(err) if wizard.workflow.step() == BulkStep::Completed => {
                    report_api_error(&err, login_url);
                    false
                }
                Err(err) => {
                    warn!(format!("interim import result unavailable: {err}"));
                    false
                }
            }
        }
        Msg::Download(file_id) => {
            download_file(file_id, config.login_url.clone());
            false
        }
        Msg::Restart => {
            wizard.workflow.reset();
            wizard.clear_task(&config);
            true
        }
    }
}

fn poll_succeeded(
    wizard: &mut BulkWizard,
    ctx: &Context<BulkWizard>,
    config: &ClientConfig,
    phase: BulkPhase,
) {
    match phase {
        BulkPhase::Validation => {
            request_validation(wizard, ctx);
            if let Some(task_id) = wizard.workflow.task_id().map(str::to_string) {
                load_missing_users(ctx.link(), task_id);
            }
        }
        BulkPhase::Execution => {
            wizard.executing = false;
            if let Err(err) = wizard.workflow.execution_finished() {
                abandon(wizard, config, &err.to_string());
                return;
            }
            request_result(wizard, ctx);
        }
    }
}

/// Re-queries the report of the current step after a filter or page change.
fn reload_report(wizard: &mut BulkWizard, ctx: &Context<BulkWizard>) {
    match wizard.workflow.step() {
        BulkStep::Validated => request_validation(wizard, ctx),
        BulkStep::Executing | BulkStep::Completed => request_result(wizard, ctx),
        BulkStep::Upload | BulkStep::Validating => {}
    }
}

fn request_validation(wizard: &mut BulkWizard, ctx: &Context<BulkWizard>) {
    let Some(task_id) = wizard.workflow.task_id().map(str::to_string) else {
        return;
    };
    match wizard.workflow.issue_validation_report(wizard.report_paging.page) {
        Ok(ticket) => load_validation(ctx.link(), ticket, task_id, wizard.report_query()),
        Err(err) => warn!(format!("validation report not requested: {err}")),
    }
}

fn request_result(wizard: &mut BulkWizard, ctx: &Context<BulkWizard>) {
    let Some(history_id) = wizard.workflow.history_id() else {
        return;
    };
    match wizard.workflow.issue_result_report(wizard.report_paging.page) {
        Ok(ticket) => load_result(ctx.link(), ticket, history_id, wizard.report_query()),
        Err(err) => warn!(format!("import result not requested: {err}")),
    }
}

fn fail_bulk(wizard: &mut BulkWizard, config: &ClientConfig, err: BulkError) {
    report_bulk_error(&err, &config.login_url);
    wizard.workflow.fail();
    wizard.clear_task(config);
}

fn abandon(wizard: &mut BulkWizard, config: &ClientConfig, message: &str) {
    show_toast(message);
    wizard.workflow.fail();
    wizard.clear_task(config);
}
