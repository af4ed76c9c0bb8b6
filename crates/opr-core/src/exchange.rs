//! JSON exchange format.
//!
//! Export writes the dataset pretty-printed with its snake_case field names.
//! Import accepts exactly that shape; there is no schema version.

use chrono::{DateTime, Utc};

use crate::error::{OprError, Result};
use crate::models::Dataset;

/// Serialize a dataset for export
pub fn to_pretty_json(dataset: &Dataset) -> Result<String> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

/// Parse an untrusted document into a dataset
pub fn parse_dataset(text: &str) -> Result<Dataset> {
    serde_json::from_str(text).map_err(|e| OprError::InvalidFormat { reason: e.to_string() })
}

/// Download file name: `opr-<city-slug>-<unix-millis>.json`.
///
/// The slug is the lowercased city name with every whitespace run,
/// leading and trailing ones included, replaced by a single `-`.
pub fn export_file_name(dataset: &Dataset, at: DateTime<Utc>) -> String {
    format!("opr-{}-{}.json", slug(&dataset.city.name), at.timestamp_millis())
}

fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    slug
}
