use common::errors::{ApiError, BulkPhase};
use common::jobs::polling::PollOutcome;
use common::jobs::TaskStatus;
use common::model::bulk::{BulkBody, MissingUsers, ResultSummary, RowStatus, ValidateSummary};
use common::model::repository::RepositorySummary;
use common::model::search::SearchResult;
use common::pagination::Paging;
use common::search::RequestTicket;
use uuid::Uuid;

pub enum Msg {
    RepositoriesLoaded(Result<SearchResult<RepositorySummary>, ApiError>),
    SelectRepository(String),
    Upload,
    Uploaded(Result<BulkBody, ApiError>),
    PollTick {
        generation: u64,
        phase: BulkPhase,
        attempt: u32,
        status: TaskStatus,
    },
    PollFinished {
        generation: u64,
        phase: BulkPhase,
        outcome: Result<Option<PollOutcome>, ApiError>,
    },
    ValidationLoaded {
        ticket: RequestTicket,
        result: Result<ValidateSummary, ApiError>,
    },
    MissingUsersLoaded {
        task_id: String,
        result: Result<MissingUsers, ApiError>,
    },
    ToggleStatusFilter(RowStatus),
    SetReportPage(Paging),
    ToggleUser(String),
    SelectAllUsers,
    DeselectAllUsers,
    SetMissingPage(Paging),
    OpenConfirm,
    CloseConfirm,
    Execute,
    ExecuteStarted(Result<BulkBody, ApiError>),
    ResultLoaded {
        ticket: RequestTicket,
        result: Result<ResultSummary, ApiError>,
    },
    Download(Uuid),
    Restart,
}
