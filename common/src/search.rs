//! Stale-response guard for search-as-you-type inputs.
//!
//! Responses may arrive in any order. Every request takes a [`RequestTicket`]
//! from [`LatestRequest::issue`]; when the response arrives, it is applied
//! only if [`LatestRequest::accepts`] still recognizes the ticket.

use log::warn;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    term: String,
    page: u32,
}

impl RequestTicket {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestRequest {
    generation: u64,
    term: String,
    page: u32,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `term` at `page`, superseding every earlier one.
    /// The term is trimmed so whitespace-only edits map to the same search.
    pub fn issue(&mut self, term: &str, page: u32) -> RequestTicket {
        self.generation += 1;
        self.term = term.trim().to_string();
        self.page = page.max(1);
        RequestTicket {
            generation: self.generation,
            term: self.term.clone(),
            page: self.page,
        }
    }

    /// Whether a response for `ticket` may still be applied.
    pub fn accepts(&self, ticket: &RequestTicket) -> bool {
        let current = ticket.generation == self.generation
            && ticket.term == self.term
            && ticket.page == self.page;
        if !current {
            warn!(
                "discarding stale response for {:?} page {}",
                ticket.term, ticket.page
            );
        }
        current
    }

    /// The trimmed term of the latest request.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Invalidates every outstanding ticket, e.g. when the input is cleared.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }
}

/// Values picked in a filter panel, keyed by the option's query key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    values: BTreeMap<String, Vec<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the values of `key`; blank values are dropped.
    pub fn set<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|value| !value.trim().is_empty())
            .collect();
        if values.is_empty() {
            self.values.remove(key);
        } else {
            self.values.insert(key.to_string(), values);
        }
    }

    /// Adds or removes one value of a multi-value option.
    pub fn toggle(&mut self, key: &str, value: &str) {
        let entry = self.values.entry(key.to_string()).or_default();
        if let Some(index) = entry.iter().position(|v| v == value) {
            entry.remove(index);
        } else {
            entry.push(value.to_string());
        }
        if entry.is_empty() {
            self.values.remove(key);
        }
    }

    pub fn values(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.values(key).first().map(String::as_str)
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.values(key).iter().any(|v| v == value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_selection_toggles_and_drops_blank_values() {
        let mut filters = FilterSelection::new();
        filters.toggle("r", "repo-1");
        filters.toggle("r", "repo-2");
        filters.toggle("r", "repo-1");
        filters.set("s", [" "]);

        assert_eq!(filters.values("r"), ["repo-2".to_string()]);
        assert_eq!(filters.first("s"), None);
        assert!(filters.contains("r", "repo-2"));

        filters.toggle("r", "repo-2");
        assert!(filters.is_empty());
    }

    #[test]
    fn newer_keystroke_supersedes_in_flight_request() {
        let mut latest = LatestRequest::new();
        let first = latest.issue("al", 1);
        let second = latest.issue("ali", 1);

        assert!(!latest.accepts(&first));
        assert!(latest.accepts(&second));
    }

    #[test]
    fn next_page_supersedes_previous_page() {
        let mut latest = LatestRequest::new();
        let page_one = latest.issue("ops", 1);
        let page_two = latest.issue("ops", 2);

        assert!(!latest.accepts(&page_one));
        assert!(latest.accepts(&page_two));
        assert_eq!(page_two.page(), 2);
    }

    #[test]
    fn reissuing_the_same_term_still_invalidates_older_tickets() {
        let mut latest = LatestRequest::new();
        let first = latest.issue("bob", 1);
        let again = latest.issue(" bob ", 1);

        assert_eq!(again.term(), "bob");
        assert!(!latest.accepts(&first));
        assert!(latest.accepts(&again));
    }

    #[test]
    fn cancel_invalidates_everything() {
        let mut latest = LatestRequest::new();
        let ticket = latest.issue("x", 1);
        latest.cancel();

        assert!(!latest.accepts(&ticket));
    }

    #[test]
    fn ticket_is_bound_to_its_key_and_page() {
        let mut task_a = LatestRequest::new();
        let mut task_b = LatestRequest::new();
        let ticket = task_a.issue("validate-a", 2);
        task_b.issue("validate-b", 2);

        assert!(task_a.accepts(&ticket));
        assert!(!task_b.accepts(&ticket));

        let mut other_page = LatestRequest::new();
        other_page.issue("validate-a", 3);
        assert!(!other_page.accepts(&ticket));
    }

    #[test]
    fn page_zero_is_issued_as_first_page() {
        let mut latest = LatestRequest::new();
        let ticket = latest.issue("history-9", 0);

        assert_eq!(ticket.page(), 1);
        assert!(latest.accepts(&ticket));
    }
}
