//! Derived presentation data: year groups, search results, and the combined page view.
//!
//! Everything here is a pure function of the loaded papers and the current
//! [`ViewState`]; callers re-derive on every state change.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::paper::Paper;

pub mod state;
pub mod stats;

pub use state::ViewState;
pub use stats::CatalogStats;

/// Papers keyed by publication year, each group in ascending date order.
#[derive(Debug, Clone, Default)]
pub struct YearGroups<'a> {
    groups: BTreeMap<i32, Vec<&'a Paper>>,
}

impl<'a> YearGroups<'a> {
    /// Years as shown on the accordion, most recent first.
    pub fn years_desc(&self) -> Vec<i32> {
        self.groups.keys().rev().copied().collect()
    }

    pub fn get(&self, year: i32) -> Option<&[&'a Paper]> {
        self.groups.get(&year).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn paper_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

fn cmp_date_asc(a: &Paper, b: &Paper) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Undated records stay at the end in both directions.
fn cmp_date_desc(a: &Paper, b: &Paper) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn group_by_year(papers: &[Paper]) -> YearGroups<'_> {
    let mut groups: BTreeMap<i32, Vec<&Paper>> = BTreeMap::new();
    for paper in papers.iter().filter(|p| p.has_known_year()) {
        groups.entry(paper.year).or_default().push(paper);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| cmp_date_asc(a, b));
    }
    YearGroups { groups }
}

/// Case-insensitive substring match on the title or any single author.
/// `query_lower` must already be trimmed and lowercased.
pub fn matches(paper: &Paper, query_lower: &str) -> bool {
    paper.title.to_lowercase().contains(query_lower)
        || paper
            .authors
            .iter()
            .any(|author| author.to_lowercase().contains(query_lower))
}

/// Matching papers with a known year, most recent first. A blank query
/// returns nothing; callers decide between browse and search mode first.
pub fn search<'a>(papers: &'a [Paper], query: &str) -> Vec<&'a Paper> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let mut results: Vec<&Paper> = papers
        .iter()
        .filter(|p| matches(p, &query))
        .filter(|p| p.has_known_year())
        .collect();
    results.sort_by(|a, b| cmp_date_desc(a, b));
    results
}

#[derive(Debug, Clone, Serialize)]
pub struct YearButton {
    pub year: i32,
    pub count: usize,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpandedYear<'a> {
    pub year: i32,
    pub papers: Vec<&'a Paper>,
}

/// What the page shows for a given state: the year accordion or a flat result list.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CatalogView<'a> {
    Browse {
        years: Vec<YearButton>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expanded: Option<ExpandedYear<'a>>,
    },
    Search {
        query: String,
        results: Vec<&'a Paper>,
    },
}

impl<'a> CatalogView<'a> {
    pub fn derive(papers: &'a [Paper], state: &ViewState) -> Self {
        if let Some(query) = state.active_query() {
            return Self::Search {
                query: query.to_string(),
                results: search(papers, query),
            };
        }

        let groups = group_by_year(papers);
        let expanded_year = state.expanded_year();
        let years = groups
            .years_desc()
            .into_iter()
            .map(|year| YearButton {
                year,
                count: groups.get(year).map_or(0, <[_]>::len),
                expanded: expanded_year == Some(year),
            })
            .collect();
        let expanded = expanded_year.and_then(|year| {
            groups.get(year).map(|papers| ExpandedYear {
                year,
                papers: papers.to_vec(),
            })
        });
        Self::Browse { years, expanded }
    }
}
