//! Runtime state of the bulk import wizard.
//!
//! The workflow itself (steps, task ids, missing-user selection) lives in
//! [`BulkWorkflow`]; this struct adds what only the page needs: the
//! repository list, report paging and filters, and the polling generation
//! that lets a newer loop or teardown silence an older one.

use common::bulk::workflow::BulkWorkflow;
use common::config::ClientConfig;
use common::errors::BulkPhase;
use common::jobs::TaskStatus;
use common::model::bulk::{ResultSummary, RowStatus};
use common::model::repository::RepositorySummary;
use common::model::user::UserDetail;
use common::pagination::Paging;
use common::requests::ResultQuery;
use std::cell::Cell;
use std::rc::Rc;
use yew::NodeRef;

/// Last status seen by a running polling loop.
pub struct PollProgress {
    pub phase: BulkPhase,
    pub attempt: u32,
    pub status: TaskStatus,
}

pub struct BulkWizard {
    pub workflow: BulkWorkflow,
    pub repositories: Vec<RepositorySummary>,
    pub file_input_ref: NodeRef,
    pub uploading: bool,
    pub executing: bool,
    /// Bumped whenever a polling loop must stop; a loop compares it with the
    /// value it started with before every fetch.
    pub poll_generation: Rc<Cell<u64>>,
    pub progress: Option<PollProgress>,
    pub status_filter: Vec<RowStatus>,
    pub report_paging: Paging,
    pub missing_paging: Paging,
    pub result: Option<ResultSummary>,
    pub confirm_open: bool,
}

impl BulkWizard {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            workflow: BulkWorkflow::new(),
            repositories: Vec::new(),
            file_input_ref: NodeRef::default(),
            uploading: false,
            executing: false,
            poll_generation: Rc::new(Cell::new(0)),
            progress: None,
            status_filter: Vec::new(),
            report_paging: Paging::first(config.default_page_size),
            missing_paging: Paging::first(config.default_page_size),
            result: None,
            confirm_open: false,
        }
    }

    /// Stops any running polling loop and returns the generation for a new
    /// one.
    pub fn next_generation(&self) -> u64 {
        let next = self.poll_generation.get() + 1;
        self.poll_generation.set(next);
        next
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.poll_generation.get() == generation
    }

    pub fn report_query(&self) -> ResultQuery {
        ResultQuery {
            statuses: self.status_filter.clone(),
            paging: Some(self.report_paging),
        }
    }

    /// The page of missing users currently shown. Missing users arrive in one
    /// response and are paged locally.
    pub fn missing_page(&self) -> &[UserDetail] {
        let users = self.workflow.missing_users();
        let start = usize::try_from(self.missing_paging.offset())
            .unwrap_or(usize::MAX)
            .min(users.len());
        let end = start
            .saturating_add(self.missing_paging.size as usize)
            .min(users.len());
        &users[start..end]
    }

    /// Clears everything tied to the abandoned file.
    pub fn clear_task(&mut self, config: &ClientConfig) {
        self.next_generation();
        self.uploading = false;
        self.executing = false;
        self.progress = None;
        self.status_filter.clear();
        self.report_paging = Paging::first(config.default_page_size);
        self.missing_paging = Paging::first(config.default_page_size);
        self.result = None;
        self.confirm_open = false;
        if let Some(input) = self.file_input_ref.cast::<web_sys::HtmlInputElement>() {
            input.set_value("");
        }
    }
}
