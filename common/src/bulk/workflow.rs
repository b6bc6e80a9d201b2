//! Step guards of the bulk import wizard.
//!
//! ```text
//! Upload --upload accepted--> Validating --report loaded--> Validated
//!    ^                                                          |
//!    |                                            execute (no errors)
//!    |                                                          v
//!    +---------------- fail / reset ---------- Completed <-- Executing
//! ```
//!
//! Any failure returns to `Upload`. The chosen repository is kept; everything
//! tied to the uploaded file is discarded.
//!
//! Report pages are requested with a [`RequestTicket`] keyed on the task (or
//! history record) they belong to. A response is applied only while its
//! ticket is the latest one and still names the current task, so a late
//! answer for an abandoned file or an older page never lands.

use log::{debug, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::bulk::selection::MissingUserSelection;
use crate::model::bulk::{BulkBody, ExecuteRequest, MissingUsers, ValidateSummary};
use crate::model::user::UserDetail;
use crate::search::{LatestRequest, RequestTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkStep {
    Upload,
    Validating,
    Validated,
    Executing,
    Completed,
}

impl BulkStep {
    /// Position in the wizard's step indicator.
    pub fn index(self) -> usize {
        match self {
            BulkStep::Upload => 0,
            BulkStep::Validating | BulkStep::Validated => 1,
            BulkStep::Executing | BulkStep::Completed => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("This action is not available in the {current:?} step.")]
    WrongStep { current: BulkStep },
    #[error("The server response did not contain the {field}.")]
    IncompleteResponse { field: &'static str },
    #[error("The file still contains {count} error row(s).")]
    ValidationErrors { count: u64 },
    #[error("Please select the repository to import into.")]
    MissingRepository,
    #[error("The response belongs to an earlier request.")]
    StaleResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkWorkflow {
    step: BulkStep,
    repository_id: Option<String>,
    task_id: Option<String>,
    temp_file_id: Option<Uuid>,
    validation: Option<ValidateSummary>,
    missing_users: Vec<UserDetail>,
    selection: MissingUserSelection,
    execute_task_id: Option<String>,
    history_id: Option<Uuid>,
    reports: LatestRequest,
}

impl Default for BulkWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkWorkflow {
    pub fn new() -> Self {
        Self {
            step: BulkStep::Upload,
            repository_id: None,
            task_id: None,
            temp_file_id: None,
            validation: None,
            missing_users: Vec::new(),
            selection: MissingUserSelection::new(),
            execute_task_id: None,
            history_id: None,
            reports: LatestRequest::new(),
        }
    }

    pub fn step(&self) -> BulkStep {
        self.step
    }

    pub fn repository_id(&self) -> Option<&str> {
        self.repository_id.as_deref()
    }

    /// Validation task id.
    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn temp_file_id(&self) -> Option<Uuid> {
        self.temp_file_id
    }

    pub fn validation(&self) -> Option<&ValidateSummary> {
        self.validation.as_ref()
    }

    pub fn missing_users(&self) -> &[UserDetail] {
        &self.missing_users
    }

    pub fn selection(&self) -> &MissingUserSelection {
        &self.selection
    }

    pub fn execute_task_id(&self) -> Option<&str> {
        self.execute_task_id.as_deref()
    }

    pub fn history_id(&self) -> Option<Uuid> {
        self.history_id
    }

    fn expect_step(&self, allowed: &[BulkStep]) -> Result<(), WorkflowError> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep { current: self.step })
        }
    }

    /// The repository can only change before a file is uploaded.
    pub fn select_repository(&mut self, repository_id: Option<String>) -> Result<(), WorkflowError> {
        self.expect_step(&[BulkStep::Upload])?;
        self.repository_id = repository_id.filter(|id| !id.trim().is_empty());
        Ok(())
    }

    /// Records the response of the upload and starts validating.
    pub fn upload_accepted(&mut self, body: BulkBody) -> Result<(), WorkflowError> {
        self.expect_step(&[BulkStep::Upload])?;
        if self.repository_id.is_none() {
            return Err(WorkflowError::MissingRepository);
        }
        let task_id = body
            .task_id
            .ok_or(WorkflowError::IncompleteResponse { field: "task id" })?;
        let temp_file_id = body
            .temp_file_id
            .ok_or(WorkflowError::IncompleteResponse {
                field: "temporary file id",
            })?;

        debug!("validation task {task_id} started");
        self.task_id = Some(task_id);
        self.temp_file_id = Some(temp_file_id);
        self.selection.reset();
        self.step = BulkStep::Validating;
        Ok(())
    }

    /// Ticket for `page` of the validation report of the current task.
    /// Supersedes every report ticket issued before.
    pub fn issue_validation_report(&mut self, page: u32) -> Result<RequestTicket, WorkflowError> {
        self.expect_step(&[BulkStep::Validating, BulkStep::Validated])?;
        let task_id = self
            .task_id
            .clone()
            .ok_or(WorkflowError::IncompleteResponse { field: "task id" })?;
        Ok(self.reports.issue(&task_id, page))
    }

    /// Whether a validation report fetched with `ticket` may be applied.
    pub fn accepts_validation(&self, ticket: &RequestTicket) -> bool {
        matches!(self.step, BulkStep::Validating | BulkStep::Validated)
            && self.task_id.as_deref() == Some(ticket.term())
            && self.reports.accepts(ticket)
    }

    /// Stores a page of the validation report. Re-querying with another
    /// filter or page replaces the previous one.
    pub fn validation_loaded(
        &mut self,
        ticket: &RequestTicket,
        summary: ValidateSummary,
    ) -> Result<(), WorkflowError> {
        self.expect_step(&[BulkStep::Validating, BulkStep::Validated])?;
        if !self.accepts_validation(ticket) {
            return Err(WorkflowError::StaleResponse);
        }
        self.validation = Some(summary);
        self.step = BulkStep::Validated;
        Ok(())
    }

    /// Stores the missing users reported for validation task `task_id`.
    pub fn missing_users_loaded(
        &mut self,
        task_id: &str,
        users: MissingUsers,
    ) -> Result<(), WorkflowError> {
        self.expect_step(&[BulkStep::Validating, BulkStep::Validated])?;
        if self.task_id.as_deref() != Some(task_id) {
            return Err(WorkflowError::StaleResponse);
        }
        self.missing_users = users.delete_users;
        Ok(())
    }

    pub fn toggle_user(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all_users(&mut self) {
        self.selection.select_all(&self.missing_users);
    }

    pub fn deselect_all_users(&mut self) {
        self.selection.deselect_all(&self.missing_users);
    }

    /// True only when validated and the report contains no error rows.
    pub fn can_execute(&self) -> bool {
        self.step == BulkStep::Validated
            && self
                .validation
                .as_ref()
                .is_some_and(|summary| summary.error_count() == 0)
    }

    /// Body of the execute call. `deleteUsers` holds the selected missing
    /// users.
    pub fn execute_request(&self) -> Result<ExecuteRequest, WorkflowError> {
        self.expect_step(&[BulkStep::Validated])?;
        let errors = self
            .validation
            .as_ref()
            .map(ValidateSummary::error_count)
            .ok_or(WorkflowError::WrongStep { current: self.step })?;
        if errors > 0 {
            return Err(WorkflowError::ValidationErrors { count: errors });
        }
        let repository_id = self
            .repository_id
            .clone()
            .ok_or(WorkflowError::MissingRepository)?;
        let task_id = self
            .task_id
            .clone()
            .ok_or(WorkflowError::IncompleteResponse { field: "task id" })?;
        let temp_file_id = self.temp_file_id.ok_or(WorkflowError::IncompleteResponse {
            field: "temporary file id",
        })?;

        Ok(ExecuteRequest {
            task_id,
            temp_file_id,
            repository_id,
            delete_users: self.selection.selected_users(&self.missing_users),
        })
    }

    /// Records the response of the execute call and starts polling it.
    pub fn execution_started(&mut self, body: BulkBody) -> Result<(), WorkflowError> {
        if !self.can_execute() {
            return Err(WorkflowError::WrongStep { current: self.step });
        }
        let task_id = body
            .task_id
            .ok_or(WorkflowError::IncompleteResponse { field: "task id" })?;
        let history_id = body
            .history_id
            .ok_or(WorkflowError::IncompleteResponse {
                field: "history id",
            })?;

        debug!("import task {task_id} started, history {history_id}");
        self.execute_task_id = Some(task_id);
        self.history_id = Some(history_id);
        self.step = BulkStep::Executing;
        Ok(())
    }

    /// Ticket for `page` of the import result. Every poll tick and the final
    /// fetch take a new one, so only the most recent answer is shown.
    pub fn issue_result_report(&mut self, page: u32) -> Result<RequestTicket, WorkflowError> {
        self.expect_step(&[BulkStep::Executing, BulkStep::Completed])?;
        let history_id = self.history_id.ok_or(WorkflowError::IncompleteResponse {
            field: "history id",
        })?;
        Ok(self.reports.issue(&history_id.to_string(), page))
    }

    /// Whether an import result fetched with `ticket` may be applied.
    pub fn accepts_result(&self, ticket: &RequestTicket) -> bool {
        matches!(self.step, BulkStep::Executing | BulkStep::Completed)
            && self
                .history_id
                .is_some_and(|id| id.to_string() == ticket.term())
            && self.reports.accepts(ticket)
    }

    pub fn execution_finished(&mut self) -> Result<(), WorkflowError> {
        self.expect_step(&[BulkStep::Executing])?;
        self.step = BulkStep::Completed;
        Ok(())
    }

    /// Abandons the current file after an error.
    pub fn fail(&mut self) {
        warn!("bulk import abandoned in the {:?} step", self.step);
        self.reset();
    }

    /// Back to the upload step, keeping the repository choice. Report
    /// tickets issued so far stay invalid.
    pub fn reset(&mut self) {
        let repository_id = self.repository_id.take();
        let mut reports = std::mem::take(&mut self.reports);
        reports.cancel();
        *self = Self {
            repository_id,
            reports,
            ..Self::new()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bulk::HistorySummary;

    fn uploaded() -> BulkBody {
        BulkBody {
            task_id: Some("validate-1".to_string()),
            temp_file_id: Some(Uuid::from_u128(7)),
            ..BulkBody::default()
        }
    }

    fn report(error: u64) -> ValidateSummary {
        ValidateSummary {
            summary: HistorySummary {
                create: 2,
                error,
                ..HistorySummary::default()
            },
            ..ValidateSummary::default()
        }
    }

    fn user(id: &str) -> UserDetail {
        UserDetail {
            id: id.to_string(),
            user_name: id.to_uppercase(),
            ..UserDetail::default()
        }
    }

    fn validated(error: u64) -> BulkWorkflow {
        let mut workflow = BulkWorkflow::new();
        workflow.select_repository(Some("repo-1".to_string())).unwrap();
        workflow.upload_accepted(uploaded()).unwrap();
        let ticket = workflow.issue_validation_report(1).unwrap();
        workflow.validation_loaded(&ticket, report(error)).unwrap();
        workflow
            .missing_users_loaded(
                "validate-1",
                MissingUsers {
                    delete_users: vec![user("u1"), user("u2"), user("u3")],
                },
            )
            .unwrap();
        workflow
    }

    fn executing() -> BulkWorkflow {
        let mut workflow = validated(0);
        workflow
            .execution_started(BulkBody {
                task_id: Some("execute-1".to_string()),
                history_id: Some(Uuid::from_u128(9)),
                ..BulkBody::default()
            })
            .unwrap();
        workflow
    }

    #[test]
    fn upload_requires_repository() {
        let mut workflow = BulkWorkflow::new();
        assert_eq!(
            workflow.upload_accepted(uploaded()),
            Err(WorkflowError::MissingRepository)
        );
        assert_eq!(workflow.step(), BulkStep::Upload);
    }

    #[test]
    fn execution_is_blocked_by_any_error_row() {
        let workflow = validated(1);

        assert!(!workflow.can_execute());
        assert_eq!(
            workflow.execute_request(),
            Err(WorkflowError::ValidationErrors { count: 1 })
        );
    }

    #[test]
    fn execution_is_blocked_before_validation() {
        let mut workflow = BulkWorkflow::new();
        workflow.select_repository(Some("repo-1".to_string())).unwrap();
        workflow.upload_accepted(uploaded()).unwrap();

        assert!(!workflow.can_execute());
        assert_eq!(
            workflow.execute_request(),
            Err(WorkflowError::WrongStep {
                current: BulkStep::Validating
            })
        );
    }

    #[test]
    fn execute_request_sends_selected_missing_users() {
        let mut workflow = validated(0);
        workflow.toggle_user("u3");
        workflow.toggle_user("u1");

        let request = workflow.execute_request().unwrap();

        assert_eq!(request.task_id, "validate-1");
        assert_eq!(request.temp_file_id, Uuid::from_u128(7));
        assert_eq!(request.repository_id, "repo-1");
        let ids: Vec<&str> = request.delete_users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[test]
    fn happy_path_reaches_completed() {
        let mut workflow = validated(0);
        workflow
            .execution_started(BulkBody {
                task_id: Some("execute-1".to_string()),
                history_id: Some(Uuid::from_u128(9)),
                ..BulkBody::default()
            })
            .unwrap();

        assert_eq!(workflow.step(), BulkStep::Executing);
        assert_eq!(workflow.execute_task_id(), Some("execute-1"));
        workflow.execution_finished().unwrap();
        assert_eq!(workflow.step(), BulkStep::Completed);
        assert_eq!(workflow.history_id(), Some(Uuid::from_u128(9)));
    }

    #[test]
    fn execute_response_without_history_id_is_rejected() {
        let mut workflow = validated(0);
        let result = workflow.execution_started(BulkBody {
            task_id: Some("execute-1".to_string()),
            ..BulkBody::default()
        });

        assert_eq!(
            result,
            Err(WorkflowError::IncompleteResponse {
                field: "history id"
            })
        );
        assert_eq!(workflow.step(), BulkStep::Validated);
    }

    #[test]
    fn failure_returns_to_upload_and_keeps_repository() {
        let mut workflow = validated(0);
        workflow.toggle_user("u1");

        workflow.fail();

        assert_eq!(workflow.step(), BulkStep::Upload);
        assert_eq!(workflow.repository_id(), Some("repo-1"));
        assert_eq!(workflow.task_id(), None);
        assert!(workflow.validation().is_none());
        assert!(workflow.missing_users().is_empty());
        assert!(workflow.selection().selected_ids().is_empty());
    }

    #[test]
    fn report_of_an_abandoned_file_does_not_validate_the_next_one() {
        let mut workflow = validated(0);
        let late = workflow.issue_validation_report(2).unwrap();
        workflow.reset();
        workflow
            .upload_accepted(BulkBody {
                task_id: Some("validate-2".to_string()),
                temp_file_id: Some(Uuid::from_u128(8)),
                ..BulkBody::default()
            })
            .unwrap();

        assert_eq!(
            workflow.validation_loaded(&late, report(0)),
            Err(WorkflowError::StaleResponse)
        );
        assert_eq!(workflow.step(), BulkStep::Validating);
        assert!(!workflow.can_execute());
        assert!(workflow.execute_request().is_err());
    }

    #[test]
    fn superseded_report_page_is_rejected() {
        let mut workflow = validated(0);
        let first = workflow.issue_validation_report(2).unwrap();
        let second = workflow.issue_validation_report(3).unwrap();

        assert!(!workflow.accepts_validation(&first));
        assert_eq!(
            workflow.validation_loaded(&first, report(4)),
            Err(WorkflowError::StaleResponse)
        );
        workflow.validation_loaded(&second, report(0)).unwrap();
        assert!(workflow.can_execute());
    }

    #[test]
    fn missing_users_of_another_task_are_rejected() {
        let mut workflow = validated(0);

        let result = workflow.missing_users_loaded(
            "validate-0",
            MissingUsers {
                delete_users: vec![user("u9")],
            },
        );

        assert_eq!(result, Err(WorkflowError::StaleResponse));
        assert_eq!(workflow.missing_users().len(), 3);
    }

    #[test]
    fn only_the_latest_import_result_is_accepted() {
        let mut workflow = executing();
        let interim = workflow.issue_result_report(1).unwrap();
        workflow.execution_finished().unwrap();
        let last = workflow.issue_result_report(1).unwrap();

        assert!(!workflow.accepts_result(&interim));
        assert!(workflow.accepts_result(&last));

        workflow.reset();
        assert!(!workflow.accepts_result(&last));
    }

    #[test]
    fn result_tickets_are_not_validation_tickets() {
        let mut workflow = executing();
        let ticket = workflow.issue_result_report(1).unwrap();

        assert!(!workflow.accepts_validation(&ticket));
        assert!(workflow.issue_validation_report(1).is_err());
    }

    #[test]
    fn repository_is_locked_after_upload() {
        let mut workflow = validated(0);
        assert!(workflow.select_repository(Some("repo-2".to_string())).is_err());
        assert_eq!(workflow.repository_id(), Some("repo-1"));
    }
}
