use serde::Serialize;

/// Interactive state of the catalog page: the search box and the year accordion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    query: String,
    expanded_year: Option<i32>,
}

impl ViewState {
    pub fn new(query: impl Into<String>, expanded_year: Option<i32>) -> Self {
        Self {
            query: query.into(),
            expanded_year,
        }
    }

    /// The search box contents exactly as entered.
    pub fn raw_query(&self) -> &str {
        &self.query
    }

    /// The query as used for matching, or `None` in browse mode.
    pub fn active_query(&self) -> Option<&str> {
        Some(self.query.trim()).filter(|q| !q.is_empty())
    }

    pub fn is_searching(&self) -> bool {
        self.active_query().is_some()
    }

    pub fn expanded_year(&self) -> Option<i32> {
        self.expanded_year
    }

    /// Clicking a year header: collapses it when already open, otherwise opens
    /// it in place of whichever year was open.
    pub fn toggle_year(&mut self, year: i32) {
        self.expanded_year = if self.expanded_year == Some(year) {
            None
        } else {
            Some(year)
        };
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }
}
