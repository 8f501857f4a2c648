use serde::Serialize;
use time::Date;
use tracing::{debug, error, info};

use crate::config::DataSource;
use crate::entities::artifact::Artifact;
use crate::error::PaperShelfError;
use crate::sources::catalog::{CatalogClient, RawPaper};
use crate::transform;

/// Year assigned to records whose publication year cannot be determined.
pub const UNKNOWN_YEAR: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    pub year: i32,
    /// Chronological sort key derived from `publication_date` (or the year).
    #[serde(skip)]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}

impl Paper {
    pub fn has_known_year(&self) -> bool {
        self.year != UNKNOWN_YEAR
    }

    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

/// The session's paper collection. Loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    papers: Vec<Paper>,
}

impl Catalog {
    pub fn from_raw(records: Vec<RawPaper>) -> Self {
        let papers: Vec<Paper> = records.into_iter().map(transform::paper::from_raw).collect();
        let undated = papers.iter().filter(|p| !p.has_known_year()).count();
        if undated > 0 {
            debug!(undated, "Records without a publication year are hidden");
        }
        Self { papers }
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

/// Fetches and normalizes the catalog.
///
/// # Errors
///
/// Returns an error when the source cannot be read or is not a JSON array.
pub async fn try_load(source: &DataSource) -> Result<Catalog, PaperShelfError> {
    let records = CatalogClient::new()?.fetch(source).await?;
    Ok(Catalog::from_raw(records))
}

/// Loads the catalog once. Failures are logged and yield an empty catalog.
pub async fn load(source: &DataSource) -> Catalog {
    match try_load(source).await {
        Ok(catalog) => {
            info!(source = %source, papers = catalog.len(), "Loaded paper catalog");
            catalog
        }
        Err(err) => {
            error!(source = %source, error = %err, "Error loading paper catalog");
            Catalog::default()
        }
    }
}
