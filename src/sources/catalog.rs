use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::config::DataSource;
use crate::error::PaperShelfError;

/// One paper record as it appears in the static catalog file.
///
/// Every field is optional: the catalog has been produced by several
/// generations of tooling and the shapes differ between them. A field with
/// an unexpected shape reads as absent instead of failing the record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaper {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_authors")]
    pub authors: Option<RawAuthors>,
    #[serde(default, deserialize_with = "lenient")]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<RawYear>,
    #[serde(default, deserialize_with = "lenient")]
    pub pdf_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub implementation_urls: Option<Vec<RawArtifact>>,
    #[serde(default, deserialize_with = "lenient")]
    pub code_link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub arxiv: Option<String>,
    #[serde(default, rename = "abstract", deserialize_with = "lenient")]
    pub abstract_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAuthors {
    Text(String),
    /// Non-string entries of an author array are dropped while reading.
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawYear {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtifact {
    #[serde(default, deserialize_with = "lenient")]
    pub identifier: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub paper_frequency: Option<u64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub extraction_methods: Option<Vec<RawExtractionMethod>>,
}

/// Provenance of an artifact link. Carried through parsing but never rendered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExtractionMethod {
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source_paragraph: Option<String>,
}

/// Reads any JSON value and keeps it only when it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`] for arrays, dropping individual elements of the wrong shape.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let serde_json::Value::Array(items) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

fn deserialize_authors<'de, D>(deserializer: D) -> Result<Option<RawAuthors>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Some(RawAuthors::Text(text)),
        serde_json::Value::Array(items) => Some(RawAuthors::List(
            items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    })
}

pub struct CatalogClient {
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new() -> Result<Self, PaperShelfError> {
        Ok(Self {
            client: crate::sources::http_client()?,
        })
    }

    /// Reads the catalog once from a URL or a local file. No retries.
    pub async fn fetch(&self, source: &DataSource) -> Result<Vec<RawPaper>, PaperShelfError> {
        let payload = match source {
            DataSource::Url(url) => self.get_bytes(url).await?,
            DataSource::File(path) => tokio::fs::read(path).await?,
        };
        parse_catalog(&source.to_string(), &payload)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, PaperShelfError> {
        debug!(url, "Fetching paper catalog");
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| PaperShelfError::Http {
                source_url: url.to_string(),
                message: err.to_string(),
            })?;
        let status = resp.status();
        let payload = crate::sources::read_limited_body(resp, url).await?;
        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&payload);
            return Err(PaperShelfError::Http {
                source_url: url.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }
        Ok(payload)
    }
}

/// Parses a catalog payload. The top level must be an array; elements that
/// do not look like paper records are skipped.
pub fn parse_catalog(source_label: &str, payload: &[u8]) -> Result<Vec<RawPaper>, PaperShelfError> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|err| PaperShelfError::InvalidJson {
            source_url: source_label.to_string(),
            message: format!("{err} ({})", crate::sources::body_excerpt(payload)),
        })?;

    let serde_json::Value::Array(items) = value else {
        return Err(PaperShelfError::InvalidJson {
            source_url: source_label.to_string(),
            message: "expected a JSON array of paper records".into(),
        });
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawPaper>(item) {
            Ok(record) => out.push(record),
            Err(err) => warn!(index, %err, "Skipping malformed paper record"),
        }
    }
    Ok(out)
}
