use serde::Serialize;

use crate::error::PaperShelfError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, PaperShelfError> {
    Ok(serde_json::to_string_pretty(value)?)
}
