//! Runtime settings resolved from CLI flags and the environment.

use std::fmt;
use std::path::PathBuf;

pub const DATA_ENV: &str = "PAPERSHELF_DATA";
pub const BASE_URL_ENV: &str = "PAPERSHELF_BASE_URL";
pub const TITLE_ENV: &str = "PAPERSHELF_TITLE";

const CATALOG_FILE: &str = "papers.json";
const DEFAULT_TITLE: &str = "Research Papers";

/// Where the paper catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_source: DataSource,
    pub page_title: String,
}

impl Settings {
    /// Resolves settings from an optional `--data` flag and the process environment.
    pub fn resolve(data_flag: Option<&str>) -> Self {
        Self::resolve_with(data_flag, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(data_flag: Option<&str>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_source = if let Some(flag) = data_flag.map(str::trim).filter(|v| !v.is_empty()) {
            DataSource::parse(flag)
        } else if let Some(data) = env_value(DATA_ENV) {
            DataSource::parse(&data)
        } else if let Some(base) = env_value(BASE_URL_ENV) {
            DataSource::parse(&join_base(&base, CATALOG_FILE))
        } else {
            DataSource::File(PathBuf::from(CATALOG_FILE))
        };

        Self {
            data_source,
            page_title: env_value(TITLE_ENV).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        }
    }
}

fn join_base(base: &str, file: &str) -> String {
    format!("{}/{file}", base.trim_end_matches('/'))
}
