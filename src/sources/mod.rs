use std::sync::OnceLock;
use std::time::Duration;

use crate::error::PaperShelfError;

pub mod catalog;

const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;
const EXCERPT_CHARS: usize = 200;

/// Shared HTTP client for catalog fetches.
///
/// # Errors
///
/// Returns an error when the underlying reqwest client cannot be built.
pub fn http_client() -> Result<reqwest::Client, PaperShelfError> {
    static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("papershelf/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(PaperShelfError::HttpClientInit)?;

    Ok(HTTP_CLIENT.get_or_init(|| client).clone())
}

pub(crate) async fn read_limited_body(
    mut resp: reqwest::Response,
    source_url: &str,
) -> Result<Vec<u8>, PaperShelfError> {
    if resp
        .content_length()
        .is_some_and(|len| len > MAX_BODY_BYTES as u64)
    {
        return Err(PaperShelfError::Http {
            source_url: source_url.to_string(),
            message: format!("Response body exceeds {MAX_BODY_BYTES} bytes"),
        });
    }

    let mut out = Vec::new();
    while let Some(chunk) = resp.chunk().await.map_err(|err| PaperShelfError::Http {
        source_url: source_url.to_string(),
        message: format!("Failed to read response body: {err}"),
    })? {
        if out.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(PaperShelfError::Http {
                source_url: source_url.to_string(),
                message: format!("Response body exceeds {MAX_BODY_BYTES} bytes"),
            });
        }
        out.extend_from_slice(&chunk);
    }
    Ok(out)
}

pub(crate) fn body_excerpt(payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(payload);
    let text = text.trim();
    if text.is_empty() {
        return "<empty body>".to_string();
    }
    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    if text.chars().count() > EXCERPT_CHARS {
        excerpt.push('…');
    }
    excerpt
}
