//! Query strings of the gateway list endpoints.
//!
//! Every list endpoint takes short single-letter parameters. The rules are
//! the same everywhere: absent and empty values are left out, list values
//! repeat their key (`i=a&i=b`), dates are `YYYY-MM-DD` and the page and page
//! size are at least one.

use chrono::NaiveDate;
use std::fmt::Display;
use thiserror::Error;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::model::bulk::RowStatus;
use crate::model::group::Visibility;
use crate::model::user::Authority;
use crate::pagination::Paging;
use crate::search::FilterSelection;

/// Sort order sent as the `d` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{input:?} is not a date in YYYY-MM-DD format.")]
    InvalidDate { input: String },
    #[error("The start date {start} is after the end date {end}.")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Parses the value of a date input; an empty input means no date.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, QueryError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| QueryError::InvalidDate {
            input: input.to_string(),
        })
}

/// Inclusive date filter sent as `s` and `e`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, QueryError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(QueryError::InvertedRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

/// Accumulates `key=value` pairs, skipping empty values.
pub struct QueryBuilder {
    serializer: form_urlencoded::Serializer<'static, String>,
    empty: bool,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            serializer: form_urlencoded::Serializer::new(String::new()),
            empty: true,
        }
    }

    pub fn push(&mut self, key: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        let value = value.trim();
        if !value.is_empty() {
            self.serializer.append_pair(key, value);
            self.empty = false;
        }
        self
    }

    pub fn push_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push_all<I>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for value in values {
            self.push(key, value);
        }
        self
    }

    pub fn push_date(&mut self, key: &str, date: Option<NaiveDate>) -> &mut Self {
        self.push_opt(key, date.map(|d| d.format("%Y-%m-%d")))
    }

    pub fn push_dates(&mut self, range: &DateRange) -> &mut Self {
        self.push_date("s", range.start).push_date("e", range.end)
    }

    pub fn push_sort(&mut self, key: Option<&str>, direction: Option<SortDirection>) -> &mut Self {
        self.push_opt("k", key)
            .push_opt("d", direction.map(SortDirection::as_str))
    }

    pub fn push_paging(&mut self, paging: Option<Paging>) -> &mut Self {
        if let Some(paging) = paging {
            self.push("p", paging.page).push("l", paging.size);
        }
        self
    }

    /// The encoded query without a leading `?`.
    pub fn finish(&mut self) -> String {
        if self.empty {
            return String::new();
        }
        self.serializer.finish()
    }
}

/// A typed parameter set of one list endpoint.
pub trait ToQuery {
    fn append_to(&self, query: &mut QueryBuilder);

    fn to_query_string(&self) -> String {
        let mut query = QueryBuilder::new();
        self.append_to(&mut query);
        query.finish()
    }

    /// `path` with the query appended, or `path` alone when nothing is set.
    fn with_path(&self, path: &str) -> String {
        match self.to_query_string() {
            query if query.is_empty() => path.to_string(),
            query => format!("{path}?{query}"),
        }
    }
}

/// Clamps a requested page and size to the allowed values.
pub fn normalize_paging(page: Option<u32>, size: Option<u32>, config: &ClientConfig) -> Paging {
    Paging::new(page.unwrap_or(1), config.page_size_or_default(size))
}

fn filter_dates(filters: &FilterSelection) -> Result<DateRange, QueryError> {
    DateRange::new(
        parse_date(filters.first("s").unwrap_or_default())?,
        parse_date(filters.first("e").unwrap_or_default())?,
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoriesQuery {
    pub search: Option<String>,
    pub sort_key: Option<String>,
    pub direction: Option<SortDirection>,
    pub paging: Option<Paging>,
}

impl ToQuery for RepositoriesQuery {
    fn append_to(&self, query: &mut QueryBuilder) {
        query
            .push_opt("q", self.search.as_deref())
            .push_sort(self.sort_key.as_deref(), self.direction)
            .push_paging(self.paging);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupsQuery {
    pub search: Option<String>,
    pub ids: Vec<String>,
    pub repositories: Vec<String>,
    pub users: Vec<String>,
    /// `Some(true)` for public groups only.
    pub public: Option<bool>,
    pub visibility: Option<Visibility>,
    pub sort_key: Option<String>,
    pub direction: Option<SortDirection>,
    pub paging: Option<Paging>,
}

impl GroupsQuery {
    /// Copies the filter panel values into the query. Codes that do not
    /// parse are ignored.
    pub fn apply_filters(&mut self, filters: &FilterSelection) {
        self.ids = filters.values("i").to_vec();
        self.repositories = filters.values("r").to_vec();
        self.users = filters.values("u").to_vec();
        self.public = match filters.first("s") {
            Some("0") => Some(true),
            Some("1") => Some(false),
            _ => None,
        };
        self.visibility = filters
            .first("v")
            .and_then(|code| code.parse::<u8>().ok())
            .and_then(|code| Visibility::ALL.into_iter().find(|v| v.filter_code() == code));
    }
}

impl ToQuery for GroupsQuery {
    fn append_to(&self, query: &mut QueryBuilder) {
        query
            .push_opt("q", self.search.as_deref())
            .push_all("i", &self.ids)
            .push_all("r", &self.repositories)
            .push_all("u", &self.users)
            .push_opt("s", self.public.map(|public| if public { 0 } else { 1 }))
            .push_opt("v", self.visibility.map(Visibility::filter_code))
            .push_sort(self.sort_key.as_deref(), self.direction)
            .push_paging(self.paging);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub ids: Vec<String>,
    pub repositories: Vec<String>,
    pub groups: Vec<String>,
    pub authorities: Vec<Authority>,
    /// Last-modified range.
    pub modified: DateRange,
    pub sort_key: Option<String>,
    pub direction: Option<SortDirection>,
    pub paging: Option<Paging>,
}

impl UsersQuery {
    pub fn apply_filters(&mut self, filters: &FilterSelection) -> Result<(), QueryError> {
        self.modified = filter_dates(filters)?;
        self.ids = filters.values("i").to_vec();
        self.repositories = filters.values("r").to_vec();
        self.groups = filters.values("g").to_vec();
        self.authorities = filters
            .values("a")
            .iter()
            .filter_map(|code| code.parse::<u8>().ok())
            .filter_map(Authority::from_code)
            .collect();
        Ok(())
    }
}

impl ToQuery for UsersQuery {
    fn append_to(&self, query: &mut QueryBuilder) {
        query
            .push_opt("q", self.search.as_deref())
            .push_all("i", &self.ids)
            .push_all("r", &self.repositories)
            .push_all("g", &self.groups)
            .push_all("a", self.authorities.iter().map(|a| a.code()))
            .push_dates(&self.modified)
            .push_sort(self.sort_key.as_deref(), self.direction)
            .push_paging(self.paging);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub dates: DateRange,
    pub users: Vec<String>,
    pub repositories: Vec<String>,
    pub groups: Vec<String>,
    pub operators: Vec<String>,
    /// Parent event whose children are requested.
    pub parent_id: Option<String>,
    pub direction: Option<SortDirection>,
    pub paging: Option<Paging>,
}

impl HistoryQuery {
    pub fn apply_filters(&mut self, filters: &FilterSelection) -> Result<(), QueryError> {
        self.dates = filter_dates(filters)?;
        self.users = filters.values("u").to_vec();
        self.repositories = filters.values("r").to_vec();
        self.groups = filters.values("g").to_vec();
        self.operators = filters.values("o").to_vec();
        Ok(())
    }
}

impl ToQuery for HistoryQuery {
    fn append_to(&self, query: &mut QueryBuilder) {
        query
            .push_dates(&self.dates)
            .push_all("u", &self.users)
            .push_all("r", &self.repositories)
            .push_all("g", &self.groups)
            .push_all("o", &self.operators)
            .push_opt("i", self.parent_id.as_deref())
            .push_opt("d", self.direction.map(SortDirection::as_str))
            .push_paging(self.paging);
    }
}

/// Row filter and paging of the validation and import reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultQuery {
    pub statuses: Vec<RowStatus>,
    pub paging: Option<Paging>,
}

impl ToQuery for ResultQuery {
    fn append_to(&self, query: &mut QueryBuilder) {
        let mut statuses = self.statuses.clone();
        statuses.sort();
        statuses.dedup();
        query
            .push_all("f", statuses.iter().map(|s| s.filter_index()))
            .push_paging(self.paging);
    }
}

/// Lazy search over the operators of a history tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorQuery {
    pub search: Option<String>,
    pub paging: Option<Paging>,
}

impl ToQuery for OperatorQuery {
    fn append_to(&self, query: &mut QueryBuilder) {
        query
            .push_opt("q", self.search.as_deref())
            .push_paging(self.paging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_values_are_omitted() {
        let query = RepositoriesQuery {
            search: Some("  ".to_string()),
            ..RepositoriesQuery::default()
        };

        assert_eq!(query.to_query_string(), "");
        assert_eq!(query.with_path("/api/repositories"), "/api/repositories");
    }

    #[test]
    fn list_values_repeat_their_key() {
        let query = GroupsQuery {
            ids: vec!["a".to_string(), "b".to_string()],
            public: Some(false),
            visibility: Some(Visibility::Hidden),
            paging: Some(Paging::new(2, 50)),
            ..GroupsQuery::default()
        };

        assert_eq!(query.to_query_string(), "i=a&i=b&s=1&v=2&p=2&l=50");
    }

    #[test]
    fn values_are_percent_encoded() {
        let query = UsersQuery {
            search: Some("jane doe&co".to_string()),
            authorities: vec![Authority::SystemAdmin, Authority::Contributor],
            modified: DateRange::new(Some(date(2025, 1, 2)), None).unwrap(),
            sort_key: Some("userName".to_string()),
            direction: Some(SortDirection::Desc),
            ..UsersQuery::default()
        };

        assert_eq!(
            query.to_query_string(),
            "q=jane+doe%26co&a=0&a=3&s=2025-01-02&k=userName&d=desc"
        );
    }

    #[test]
    fn history_query_carries_every_filter() {
        let query = HistoryQuery {
            dates: DateRange::new(Some(date(2025, 3, 1)), Some(date(2025, 3, 31))).unwrap(),
            operators: vec!["op1".to_string()],
            parent_id: Some("parent".to_string()),
            direction: Some(SortDirection::Asc),
            paging: Some(Paging::first(5)),
            ..HistoryQuery::default()
        };

        assert_eq!(
            query.with_path("/api/history/download"),
            "/api/history/download?s=2025-03-01&e=2025-03-31&o=op1&i=parent&d=asc&p=1&l=5"
        );
    }

    #[test]
    fn result_filter_is_sorted_and_unique() {
        let query = ResultQuery {
            statuses: vec![RowStatus::Error, RowStatus::Create, RowStatus::Error],
            paging: Some(Paging::new(0, 0)),
        };

        assert_eq!(query.to_query_string(), "f=0&f=4&p=1&l=1");
    }

    #[rstest]
    #[case(None, None, 1, 20)]
    #[case(Some(0), Some(50), 1, 50)]
    #[case(Some(3), Some(7), 3, 20)]
    fn paging_is_normalized(
        #[case] page: Option<u32>,
        #[case] size: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
    ) {
        let paging = normalize_paging(page, size, &ClientConfig::default());
        assert_eq!(paging, Paging::new(expected_page, expected_size));
    }

    #[rstest]
    #[case("", Ok(None))]
    #[case("2025-02-28", Ok(Some(date(2025, 2, 28))))]
    #[case("2025-02-30", Err(QueryError::InvalidDate { input: "2025-02-30".to_string() }))]
    #[case("28/02/2025", Err(QueryError::InvalidDate { input: "28/02/2025".to_string() }))]
    fn parses_date_inputs(#[case] input: &str, #[case] expected: Result<Option<NaiveDate>, QueryError>) {
        assert_eq!(parse_date(input), expected);
    }

    #[test]
    fn filter_panel_values_map_onto_typed_queries() {
        let mut filters = FilterSelection::new();
        filters.set("a", ["1", "9", "x"]);
        filters.set("s", ["2025-01-01"]);
        filters.set("g", ["g1", "g2"]);
        let mut users = UsersQuery::default();
        users.apply_filters(&filters).unwrap();

        assert_eq!(users.authorities, vec![Authority::RepositoryAdmin]);
        assert_eq!(users.groups, vec!["g1", "g2"]);
        assert_eq!(users.modified.start(), Some(date(2025, 1, 1)));

        let mut groups_filters = FilterSelection::new();
        groups_filters.set("s", ["0"]);
        groups_filters.set("v", ["1"]);
        let mut groups = GroupsQuery::default();
        groups.apply_filters(&groups_filters);
        assert_eq!(groups.public, Some(true));
        assert_eq!(groups.visibility, Some(Visibility::Private));
    }

    #[test]
    fn history_filters_reject_bad_dates() {
        let mut filters = FilterSelection::new();
        filters.set("e", ["tomorrow"]);
        let mut query = HistoryQuery::default();

        assert!(matches!(
            query.apply_filters(&filters),
            Err(QueryError::InvalidDate { .. })
        ));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let start = date(2025, 5, 2);
        let end = date(2025, 5, 1);
        assert_eq!(
            DateRange::new(Some(start), Some(end)),
            Err(QueryError::InvertedRange { start, end })
        );
        assert!(DateRange::new(Some(end), Some(end)).is_ok());
    }
}
