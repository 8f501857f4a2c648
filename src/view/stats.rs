use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::paper::Paper;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub listed: usize,
    pub undated: usize,
    pub with_pdf: usize,
    pub with_artifacts: usize,
    /// Artifact counts keyed by lowercased type string.
    pub artifact_types: BTreeMap<String, usize>,
    /// Listed papers per year, most recent first.
    pub years: Vec<(i32, usize)>,
}

impl CatalogStats {
    pub fn collect(papers: &[Paper]) -> Self {
        let mut out = Self {
            total: papers.len(),
            ..Self::default()
        };
        let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
        for paper in papers {
            if paper.has_known_year() {
                out.listed += 1;
                *per_year.entry(paper.year).or_default() += 1;
            } else {
                out.undated += 1;
            }
            if paper.pdf_link.is_some() {
                out.with_pdf += 1;
            }
            if !paper.artifacts.is_empty() {
                out.with_artifacts += 1;
            }
            for artifact in &paper.artifacts {
                *out
                    .artifact_types
                    .entry(artifact.raw_type.to_lowercase())
                    .or_default() += 1;
            }
        }
        out.years = per_year.into_iter().rev().collect();
        out
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Catalog Summary\n\n");
        out.push_str(&format!("- Papers: {}\n", self.total));
        out.push_str(&format!("- Listed by year: {}\n", self.listed));
        if self.undated > 0 {
            out.push_str(&format!("- Hidden (no publication year): {}\n", self.undated));
        }
        out.push_str(&format!("- With PDF link: {}\n", self.with_pdf));
        out.push_str(&format!("- With artifacts: {}\n", self.with_artifacts));

        if !self.years.is_empty() {
            out.push_str("\n| Year | Papers |\n");
            out.push_str("|------|--------|\n");
            for (year, count) in &self.years {
                out.push_str(&format!("| {year} | {count} |\n"));
            }
        }

        if !self.artifact_types.is_empty() {
            out.push_str("\n| Artifact type | Links |\n");
            out.push_str("|---------------|-------|\n");
            for (kind, count) in &self.artifact_types {
                out.push_str(&format!("| {kind} | {count} |\n"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::catalog::RawPaper;
    use crate::transform::paper::from_raw;

    fn papers() -> Vec<Paper> {
        serde_json::from_value::<Vec<RawPaper>>(serde_json::json!([
            {"title": "A", "publication_date": "2020-01-01", "pdf_link": "https://x/a.pdf",
             "implementation_urls": [{"identifier": "https://github.com/a/b", "type": "git"},
                                     {"identifier": "https://zenodo.org/records/1", "type": "Zenodo"}]},
            {"title": "B", "publication_date": "2021-06-01",
             "implementation_urls": [{"identifier": "https://github.com/c/d", "type": "GIT"}]},
            {"title": "C", "publication_date": ""}
        ]))
        .unwrap()
        .into_iter()
        .map(from_raw)
        .collect()
    }

    #[test]
    fn collect_counts_listed_and_hidden_records() {
        let stats = CatalogStats::collect(&papers());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.listed, 2);
        assert_eq!(stats.undated, 1);
        assert_eq!(stats.with_pdf, 1);
        assert_eq!(stats.with_artifacts, 2);
        assert_eq!(stats.artifact_types.get("git"), Some(&2));
        assert_eq!(stats.artifact_types.get("zenodo"), Some(&1));
        assert_eq!(stats.years, vec![(2021, 1), (2020, 1)]);
    }

    #[test]
    fn markdown_omits_hidden_line_when_everything_is_dated() {
        let dated: Vec<Paper> = papers().into_iter().filter(Paper::has_known_year).collect();
        let md = CatalogStats::collect(&dated).to_markdown();
        assert!(!md.contains("Hidden"));
        assert!(md.contains("| 2021 | 1 |"));
    }

    #[test]
    fn markdown_for_empty_catalog_has_no_tables() {
        let md = CatalogStats::collect(&[]).to_markdown();
        assert!(md.contains("- Papers: 0"));
        assert!(!md.contains("| Year |"));
    }
}
