//! Client state of the history browser.
//!
//! - [`PublicFlags`] keeps the public/private flag of each loaded row and
//!   applies the gateway's echo after a toggle succeeds.
//! - [`ChildPages`] loads the re-downloads grouped under a parent download
//!   event, one fixed-size page at a time.

use std::collections::HashMap;
use uuid::Uuid;

use crate::model::history::{DownloadHistory, HistoryPublic};
use crate::pagination::{PageLoader, Paging};

/// Public flag per history record, keyed by record id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicFlags {
    flags: HashMap<Uuid, bool>,
}

impl PublicFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the flags from a freshly loaded page, replacing earlier values.
    pub fn load<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (Uuid, bool)>,
    {
        self.flags.extend(rows);
    }

    pub fn get(&self, id: &Uuid) -> Option<bool> {
        self.flags.get(id).copied()
    }

    /// Body to send for toggling `id`, or `None` for an unknown record.
    pub fn toggle_request(&self, id: &Uuid) -> Option<HistoryPublic> {
        self.get(id).map(|public| HistoryPublic { public: !public })
    }

    /// Applies the value echoed by the gateway after a successful toggle.
    pub fn apply(&mut self, id: Uuid, echoed: HistoryPublic) {
        self.flags.insert(id, echoed.public);
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

/// Children of one parent download event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildList {
    loader: PageLoader,
    rows: Vec<DownloadHistory>,
}

impl ChildList {
    pub fn rows(&self) -> &[DownloadHistory] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    pub fn has_more(&self) -> bool {
        !self.loader.is_exhausted()
    }
}

/// Lazily fetched children of expanded download parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildPages {
    page_size: u32,
    expanded: HashMap<Uuid, ChildList>,
}

impl ChildPages {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            expanded: HashMap::new(),
        }
    }

    pub fn is_expanded(&self, parent: &Uuid) -> bool {
        self.expanded.contains_key(parent)
    }

    pub fn children(&self, parent: &Uuid) -> Option<&ChildList> {
        self.expanded.get(parent)
    }

    /// Expands `parent` and reserves its first page. Returns `None` when the
    /// parent is already expanded.
    pub fn expand(&mut self, parent: Uuid) -> Option<Paging> {
        if self.expanded.contains_key(&parent) {
            return None;
        }
        let mut list = ChildList {
            loader: PageLoader::new(self.page_size),
            rows: Vec::new(),
        };
        let paging = list.loader.begin();
        self.expanded.insert(parent, list);
        paging
    }

    /// Reserves the next page of an expanded parent, if any is left and none
    /// is in flight.
    pub fn load_more(&mut self, parent: &Uuid) -> Option<Paging> {
        self.expanded.get_mut(parent)?.loader.begin()
    }

    /// Appends a fetched page. Returns `false` when the page was stale or the
    /// parent was collapsed meanwhile.
    pub fn receive(
        &mut self,
        parent: &Uuid,
        page: u32,
        rows: Vec<DownloadHistory>,
        total: u64,
    ) -> bool {
        let Some(list) = self.expanded.get_mut(parent) else {
            return false;
        };
        if !list.loader.complete(page, rows.len(), total) {
            return false;
        }
        list.rows.extend(rows);
        true
    }

    pub fn fail(&mut self, parent: &Uuid, page: u32) {
        if let Some(list) = self.expanded.get_mut(parent) {
            list.loader.fail(page);
        }
    }

    pub fn collapse(&mut self, parent: &Uuid) {
        self.expanded.remove(parent);
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::UserSummary;
    use chrono::{TimeZone, Utc};

    fn child(n: u128, parent: Uuid) -> DownloadHistory {
        DownloadHistory {
            id: Uuid::from_u128(n),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            operator: UserSummary {
                id: "op".to_string(),
                user_name: None,
                email: None,
                eppn: None,
                last_modified: None,
            },
            public: false,
            parent_id: Some(parent),
            file_path: format!("/data/{n}.csv"),
            file_id: None,
            repositories: Vec::new(),
            groups: Vec::new(),
            users: Vec::new(),
            children_count: 0,
        }
    }

    #[test]
    fn two_identical_toggles_restore_the_original_state() {
        let id = Uuid::from_u128(1);
        let mut flags = PublicFlags::new();
        flags.load([(id, false)]);

        let first = flags.toggle_request(&id).unwrap();
        flags.apply(id, first);
        assert_eq!(flags.get(&id), Some(true));

        let second = flags.toggle_request(&id).unwrap();
        flags.apply(id, second);
        assert_eq!(flags.get(&id), Some(false));
    }

    #[test]
    fn server_echo_wins_over_the_request() {
        let id = Uuid::from_u128(2);
        let mut flags = PublicFlags::new();
        flags.load([(id, true)]);

        let request = flags.toggle_request(&id).unwrap();
        assert!(!request.public);
        flags.apply(id, HistoryPublic { public: true });

        assert_eq!(flags.get(&id), Some(true));
    }

    #[test]
    fn unknown_record_cannot_be_toggled() {
        assert_eq!(PublicFlags::new().toggle_request(&Uuid::from_u128(3)), None);
    }

    #[test]
    fn children_load_in_fixed_pages_without_duplicates() {
        let parent = Uuid::from_u128(10);
        let mut pages = ChildPages::new(2);

        let first = pages.expand(parent).unwrap();
        assert_eq!((first.page, first.size), (1, 2));
        assert_eq!(pages.expand(parent), None);
        assert_eq!(pages.load_more(&parent), None);

        assert!(pages.receive(&parent, 1, vec![child(11, parent), child(12, parent)], 3));
        let second = pages.load_more(&parent).unwrap();
        assert_eq!(second.page, 2);
        assert!(pages.receive(&parent, 2, vec![child(13, parent)], 3));

        let list = pages.children(&parent).unwrap();
        assert_eq!(list.rows().len(), 3);
        assert!(!list.has_more());
        assert_eq!(pages.load_more(&parent), None);
    }

    #[test]
    fn collapsed_parent_drops_late_pages() {
        let parent = Uuid::from_u128(20);
        let mut pages = ChildPages::new(5);
        pages.expand(parent);
        pages.collapse(&parent);

        assert!(!pages.receive(&parent, 1, vec![child(21, parent)], 1));
        assert!(!pages.is_expanded(&parent));
    }
}
