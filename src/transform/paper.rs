use std::sync::OnceLock;

use regex::Regex;
use time::{Date, Month};

use crate::entities::artifact::Artifact;
use crate::entities::paper::{Paper, UNKNOWN_YEAR};
use crate::sources::catalog::{RawArtifact, RawAuthors, RawPaper, RawYear};

const FALLBACK_ARTIFACT_TYPE: &str = "artifact";

fn leading_int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\+?(\d+)").expect("valid regex"))
}

fn git_host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^https?://([^/]*\.)?(github\.com|gitlab\.[a-z.]+|bitbucket\.org)/")
            .expect("valid regex")
    })
}

fn zenodo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(^https?://([^/]*\.)?zenodo\.org/|10\.5281/zenodo\.)").expect("valid regex")
    })
}

/// Maps one catalog record into the canonical [`Paper`] shape.
pub fn from_raw(record: RawPaper) -> Paper {
    let publication_date = non_empty(record.publication_date);
    let year = derive_year(record.year.as_ref(), publication_date.as_deref());
    let date = publication_date
        .as_deref()
        .and_then(parse_publication_date)
        .or_else(|| start_of_year(year));

    let mut artifacts = record
        .implementation_urls
        .unwrap_or_default()
        .into_iter()
        .filter_map(artifact_from_raw)
        .collect::<Vec<_>>();
    if artifacts.is_empty() {
        if let Some(link) = web_link(record.code_link) {
            let kind = infer_link_type(&link);
            artifacts.push(Artifact::new(link, kind));
        }
    }

    Paper {
        title: record.title.map(|t| t.trim().to_string()).unwrap_or_default(),
        authors: split_authors(record.authors.as_ref()),
        publication_date,
        year,
        date,
        pdf_link: web_link(record.pdf_link),
        artifacts,
        doi: non_empty(record.doi),
        arxiv: non_empty(record.arxiv),
        abstract_text: non_empty(record.abstract_text),
    }
}

/// Publication year of a record, or [`UNKNOWN_YEAR`].
///
/// An explicit year field takes precedence; otherwise the leading integer of
/// the first `-`-separated segment of the publication date is used.
pub fn derive_year(year: Option<&RawYear>, publication_date: Option<&str>) -> i32 {
    if let Some(year) = year.and_then(year_from_field) {
        return year;
    }
    let Some(date) = publication_date.map(str::trim).filter(|d| !d.is_empty()) else {
        return UNKNOWN_YEAR;
    };
    let first = date.split('-').next().unwrap_or_default();
    leading_int_re()
        .captures(first)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or(UNKNOWN_YEAR)
}

fn year_from_field(year: &RawYear) -> Option<i32> {
    let value = match year {
        RawYear::Integer(v) => i32::try_from(*v).ok()?,
        RawYear::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(i32::MAX) => {
            *v as i32
        }
        RawYear::Float(_) => return None,
        RawYear::Text(v) => v.trim().parse::<i32>().ok()?,
    };
    (value >= 0).then_some(value)
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, optionally followed by a time part.
/// Missing month or day default to the first.
pub fn parse_publication_date(value: &str) -> Option<Date> {
    let value = value.trim();
    let date_part = value
        .split(|c: char| c == 'T' || c == 't' || c.is_whitespace())
        .next()?;
    let mut parts = date_part.split('-');
    let year = parse_digits(parts.next()?)?;
    let month = parts.next().map(parse_digits).unwrap_or(Some(1))?;
    let day = parts.next().map(parse_digits).unwrap_or(Some(1))?;
    if parts.next().is_some() {
        return None;
    }
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Date::from_calendar_date(year, month, u8::try_from(day).ok()?).ok()
}

fn parse_digits(value: &str) -> Option<i32> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse::<i32>().ok()
}

fn start_of_year(year: i32) -> Option<Date> {
    if year == UNKNOWN_YEAR {
        return None;
    }
    Date::from_calendar_date(year, Month::January, 1).ok()
}

fn split_authors(authors: Option<&RawAuthors>) -> Vec<String> {
    let tokens: Vec<&str> = match authors {
        None => Vec::new(),
        Some(RawAuthors::Text(text)) => text.split(',').collect(),
        Some(RawAuthors::List(list)) => list.iter().map(String::as_str).collect(),
    };
    tokens
        .into_iter()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

fn artifact_from_raw(raw: RawArtifact) -> Option<Artifact> {
    let url = web_link(raw.identifier)?;
    let kind = non_empty(raw.kind).unwrap_or_else(|| FALLBACK_ARTIFACT_TYPE.to_string());
    Some(Artifact::new(url, kind))
}

/// Guesses an artifact type for a legacy `code_link` URL.
fn infer_link_type(link: &str) -> &'static str {
    if zenodo_re().is_match(link) {
        "zenodo"
    } else if git_host_re().is_match(link) || link.trim_end_matches('/').ends_with(".git") {
        "git"
    } else {
        "code"
    }
}

/// Keeps only absolute `http` or `https` links; anything else is not rendered as a link.
fn web_link(value: Option<String>) -> Option<String> {
    non_empty(value).filter(|link| {
        let lower = link.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
