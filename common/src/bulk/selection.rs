//! Which missing users the operator marked for deletion.

use std::collections::HashMap;

use crate::model::user::UserDetail;

/// Selection flags keyed by user id. Flags survive paging: switching pages
/// only changes which users are loaded, never what was selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingUserSelection {
    flags: HashMap<String, bool>,
}

impl MissingUserSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag of `id` and returns the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let flag = self.flags.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        self.flags.insert(id.to_string(), selected);
    }

    pub fn select_all(&mut self, loaded: &[UserDetail]) {
        for user in loaded {
            self.set(&user.id, true);
        }
    }

    pub fn deselect_all(&mut self, loaded: &[UserDetail]) {
        for user in loaded {
            self.set(&user.id, false);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Whether every loaded user is selected; `false` for an empty set.
    pub fn all_selected(&self, loaded: &[UserDetail]) -> bool {
        !loaded.is_empty() && loaded.iter().all(|user| self.is_selected(&user.id))
    }

    /// Selected ids in sorted order.
    pub fn selected_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .flags
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The loaded users that are selected, in load order.
    pub fn selected_users(&self, loaded: &[UserDetail]) -> Vec<UserDetail> {
        loaded
            .iter()
            .filter(|user| self.is_selected(&user.id))
            .cloned()
            .collect()
    }

    pub fn reset(&mut self) {
        self.flags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserDetail {
        UserDetail {
            id: id.to_string(),
            user_name: format!("name-{id}"),
            ..UserDetail::default()
        }
    }

    #[test]
    fn toggle_affects_only_that_user() {
        let mut selection = MissingUserSelection::new();
        selection.set("b", true);

        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(selection.is_selected("b"));
        assert!(!selection.is_selected("c"));

        assert!(!selection.toggle("a"));
        assert!(selection.is_selected("b"));
    }

    #[test]
    fn select_all_touches_exactly_the_loaded_set() {
        let page_one = [user("a"), user("b")];
        let page_two = [user("c")];
        let mut selection = MissingUserSelection::new();
        selection.set("c", true);

        selection.select_all(&page_one);
        assert_eq!(selection.selected_ids(), vec!["a", "b", "c"]);

        selection.deselect_all(&page_one);
        assert_eq!(selection.selected_ids(), vec!["c"]);
        assert!(selection.all_selected(&page_two));
        assert!(!selection.all_selected(&[]));
    }

    #[test]
    fn selected_users_keep_load_order() {
        let loaded = [user("z"), user("a"), user("m")];
        let mut selection = MissingUserSelection::new();
        selection.toggle("m");
        selection.toggle("z");

        let ids: Vec<String> = selection
            .selected_users(&loaded)
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["z", "m"]);

        selection.reset();
        assert!(selection.selected_ids().is_empty());
    }
}
