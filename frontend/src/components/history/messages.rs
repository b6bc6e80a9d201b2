use common::errors::ApiError;
use common::model::history::{
    DownloadHistory, HistoryFilterOptions, HistoryPublic, HistoryTab, UploadHistory,
};
use common::model::search::SearchResult;
use common::pagination::Paging;
use common::search::{FilterSelection, RequestTicket};
use uuid::Uuid;

pub enum Msg {
    SetTab(HistoryTab),
    FilterOptionsLoaded(Result<HistoryFilterOptions, ApiError>),
    SetFilters(FilterSelection),
    SetDate { key: &'static str, value: String },
    SetOperators(Vec<String>),
    ToggleDirection,
    SetPaging(Paging),
    Refresh,
    DownloadsLoaded {
        ticket: RequestTicket,
        result: Result<SearchResult<DownloadHistory>, ApiError>,
    },
    UploadsLoaded {
        ticket: RequestTicket,
        result: Result<SearchResult<UploadHistory>, ApiError>,
    },
    TogglePublic(Uuid),
    PublicUpdated {
        id: Uuid,
        result: Result<HistoryPublic, ApiError>,
    },
    Expand(Uuid),
    Collapse(Uuid),
    MoreChildren(Uuid),
    ChildrenLoaded {
        parent: Uuid,
        page: u32,
        result: Result<SearchResult<DownloadHistory>, ApiError>,
    },
    Download(Uuid),
}
