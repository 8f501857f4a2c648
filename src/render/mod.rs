use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::entities::artifact::ArtifactLinks;
use crate::entities::paper::Paper;
use crate::error::PaperShelfError;
use crate::view::{CatalogView, ViewState, group_by_year};

pub mod html;
pub mod json;
pub mod markdown;

pub(crate) fn environment() -> Result<Environment<'static>, PaperShelfError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env.add_template("catalog.md", include_str!("templates/catalog.md.j2"))?;
    env.add_template("card.md", include_str!("templates/card.md.j2"))?;
    env.add_template("page.html", include_str!("templates/page.html.j2"))?;
    env.add_template("card.html", include_str!("templates/card.html.j2"))?;
    Ok(env)
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LinkItem {
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ArtifactSection {
    /// One of `none`, `single`, `many`.
    pub mode: &'static str,
    pub links: Vec<LinkItem>,
}

impl ArtifactSection {
    fn from_paper(paper: &Paper) -> Self {
        match ArtifactLinks::from_slice(&paper.artifacts) {
            ArtifactLinks::Hidden => Self {
                mode: "none",
                links: Vec::new(),
            },
            ArtifactLinks::Single(artifact) => Self {
                mode: "single",
                links: vec![LinkItem {
                    url: artifact.url.clone(),
                    label: artifact.inline_label(),
                }],
            },
            ArtifactLinks::Disclosure(artifacts) => Self {
                mode: "many",
                links: artifacts
                    .iter()
                    .map(|a| LinkItem {
                        url: a.url.clone(),
                        label: a.list_label(),
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PaperCard {
    pub title: String,
    pub authors: String,
    /// Author names as a JSON array, for matching in the browser.
    pub author_list: String,
    pub year: i32,
    /// Julian day of the sort date; orders search results in the browser.
    pub day: Option<i32>,
    pub publication_date: Option<String>,
    pub pdf_link: Option<String>,
    pub artifacts: ArtifactSection,
}

impl PaperCard {
    fn from_paper(paper: &Paper) -> Self {
        Self {
            title: paper.title.clone(),
            authors: paper.authors_display(),
            author_list: serde_json::to_string(&paper.authors).unwrap_or_else(|_| "[]".into()),
            year: paper.year,
            day: paper.date.map(|date| date.to_julian_day()),
            publication_date: paper.publication_date.clone(),
            pdf_link: paper.pdf_link.clone(),
            artifacts: ArtifactSection::from_paper(paper),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct YearSection {
    pub year: i32,
    pub count: usize,
    pub expanded: bool,
    pub cards: Vec<PaperCard>,
}

/// Template context shared by the Markdown and HTML renderers.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PageContext {
    pub title: String,
    pub mode: &'static str,
    /// Trimmed query used for matching.
    pub query: String,
    /// Search box contents as typed.
    pub raw_query: String,
    pub years: Vec<YearSection>,
    pub results: Vec<PaperCard>,
    pub generated_at: Option<String>,
}

impl PageContext {
    /// Builds the context for one state of the page. With `all_years`, every
    /// year carries its cards, in search mode too, so a browser can open or
    /// filter any of them; otherwise only the expanded year does.
    pub fn build(papers: &[Paper], state: &ViewState, title: &str, all_years: bool) -> Self {
        let (mode, results) = match CatalogView::derive(papers, state) {
            CatalogView::Browse { .. } => ("browse", Vec::new()),
            CatalogView::Search { results, .. } => (
                "search",
                results.iter().map(|p| PaperCard::from_paper(p)).collect(),
            ),
        };
        Self {
            title: title.to_string(),
            mode,
            query: state.active_query().unwrap_or_default().to_string(),
            raw_query: state.raw_query().to_string(),
            years: year_sections(papers, state.expanded_year(), all_years),
            results,
            generated_at: None,
        }
    }
}

fn year_sections(papers: &[Paper], expanded_year: Option<i32>, all_years: bool) -> Vec<YearSection> {
    let groups = group_by_year(papers);
    groups
        .years_desc()
        .into_iter()
        .map(|year| {
            let shown = groups.get(year).unwrap_or_default();
            let expanded = expanded_year == Some(year);
            YearSection {
                year,
                count: shown.len(),
                expanded,
                cards: if all_years || expanded {
                    shown.iter().map(|p| PaperCard::from_paper(p)).collect()
                } else {
                    Vec::new()
                },
            }
        })
        .collect()
}
