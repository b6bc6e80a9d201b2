//! Async side effects of the bulk wizard.

use common::bulk::upload::UploadCandidate;
use common::errors::{ApiError, BulkPhase};
use common::jobs::polling::{poll_task, PollConfig};
use common::jobs::TaskStatus;
use common::model::bulk::BulkBody;
use common::requests::ResultQuery;
use common::search::RequestTicket;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;
use uuid::Uuid;
use web_sys::{File, HtmlInputElement};
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::NodeRef;

use super::messages::Msg;
use super::state::BulkWizard;
use crate::api;

/// Files currently picked in the upload input.
pub fn picked_files(input_ref: &NodeRef) -> Vec<File> {
    let Some(files) = input_ref
        .cast::<HtmlInputElement>()
        .and_then(|input| input.files())
    else {
        return Vec::new();
    };
    (0..files.length()).filter_map(|index| files.get(index)).collect()
}

pub fn candidate(file: &File) -> UploadCandidate {
    UploadCandidate::new(file.name(), file.type_(), file.size() as u64)
}

async fn fetch_status(phase: BulkPhase, task_id: &str) -> Result<TaskStatus, ApiError> {
    let body: BulkBody = match phase {
        BulkPhase::Validation => api::bulk::validate_status(task_id).await?,
        BulkPhase::Execution => api::bulk::execute_status(task_id).await?,
    };
    Ok(body.status.unwrap_or(TaskStatus::Unknown))
}

fn sleep(interval: Duration) -> TimeoutFuture {
    TimeoutFuture::new(u32::try_from(interval.as_millis()).unwrap_or(u32::MAX))
}

/// Starts polling `task_id`, stopping any earlier loop of this wizard.
pub fn start_polling(
    wizard: &BulkWizard,
    link: &Scope<BulkWizard>,
    config: PollConfig,
    phase: BulkPhase,
    task_id: String,
) {
    let generation = wizard.next_generation();
    let cancel = wizard.poll_generation.clone();
    let link = link.clone();
    spawn_local(async move {
        let tick_link = link.clone();
        let outcome = poll_task(
            &config,
            || {
                let task_id = task_id.clone();
                async move { fetch_status(phase, &task_id).await }
            },
            sleep,
            |attempt, status| {
                tick_link.send_message(Msg::PollTick {
                    generation,
                    phase,
                    attempt,
                    status: status.clone(),
                })
            },
            move || cancel.get() != generation,
        )
        .await;
        link.send_message(Msg::PollFinished {
            generation,
            phase,
            outcome,
        });
    });
}

/// Fetches a page of the validation report; the ticket travels with the
/// answer so the wizard can drop it once superseded.
pub fn load_validation(
    link: &Scope<BulkWizard>,
    ticket: RequestTicket,
    task_id: String,
    query: ResultQuery,
) {
    let link = link.clone();
    spawn_local(async move {
        let result = api::bulk::validate_result(&task_id, &query).await;
        link.send_message(Msg::ValidationLoaded { ticket, result });
    });
}

pub fn load_missing_users(link: &Scope<BulkWizard>, task_id: String) {
    let link = link.clone();
    spawn_local(async move {
        let result = api::bulk::missing_users(&task_id).await;
        link.send_message(Msg::MissingUsersLoaded { task_id, result });
    });
}

pub fn load_result(
    link: &Scope<BulkWizard>,
    ticket: RequestTicket,
    history_id: Uuid,
    query: ResultQuery,
) {
    let link = link.clone();
    spawn_local(async move {
        let result = api::bulk::result(history_id, &query).await;
        link.send_message(Msg::ResultLoaded { ticket, result });
    });
}
