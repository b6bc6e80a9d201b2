//! State of the history browser.

use common::config::ClientConfig;
use common::history::{ChildPages, PublicFlags};
use common::model::history::{DownloadHistory, HistoryTab, UploadHistory};
use common::model::search::{FilterOption, SearchResult};
use common::pagination::Paging;
use common::requests::{HistoryQuery, QueryError, SortDirection};
use common::search::{FilterSelection, LatestRequest};

pub struct HistoryBrowser {
    pub tab: HistoryTab,
    pub filter_options: Vec<FilterOption>,
    /// Filter values keyed by query key; dates live under `s` and `e`.
    pub filters: FilterSelection,
    pub direction: SortDirection,
    pub paging: Paging,
    /// Guards the table against answers for a previous tab, filter or page.
    pub latest: LatestRequest,
    pub loading: bool,
    pub downloads: Option<SearchResult<DownloadHistory>>,
    pub uploads: Option<SearchResult<UploadHistory>>,
    pub flags: PublicFlags,
    pub children: ChildPages,
}

impl HistoryBrowser {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            tab: HistoryTab::Download,
            filter_options: Vec::new(),
            filters: FilterSelection::new(),
            direction: SortDirection::Desc,
            paging: Paging::first(config.default_page_size),
            latest: LatestRequest::new(),
            loading: false,
            downloads: None,
            uploads: None,
            flags: PublicFlags::new(),
            children: ChildPages::new(config.child_page_size),
        }
    }

    pub fn query(&self) -> Result<HistoryQuery, QueryError> {
        let mut query = HistoryQuery {
            direction: Some(self.direction),
            paging: Some(self.paging),
            ..HistoryQuery::default()
        };
        query.apply_filters(&self.filters)?;
        Ok(query)
    }

    /// Query for the next page of children of `parent`.
    pub fn child_query(&self, parent: &uuid::Uuid, paging: Paging) -> HistoryQuery {
        HistoryQuery {
            parent_id: Some(parent.to_string()),
            direction: Some(self.direction),
            paging: Some(paging),
            ..HistoryQuery::default()
        }
    }

    pub fn total(&self) -> u64 {
        match self.tab {
            HistoryTab::Download => self.downloads.as_ref().map_or(0, |found| found.total),
            HistoryTab::Upload => self.uploads.as_ref().map_or(0, |found| found.total),
        }
    }
}
