//! Alert Feed Exporter
//!
//! Serializes the run's alert bundles into one pretty-printed JSON array
//! for the presentation layer. The write goes to a temporary sibling file
//! first and is renamed into place, so a consumer never observes a
//! truncated feed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use alerting::AlertBundle;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("feed serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("feed write failed: {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One feed record. Field order is the feed's logical shape:
/// `location_id`, `location`, `alerts`.
#[derive(Debug, Serialize)]
struct FeedEntry<'a> {
    location_id: &'a str,
    location: &'a str,
    alerts: &'a [&'static str],
}

/// Write all bundles to `path`, preserving bundle order.
pub fn write_feed(bundles: &[AlertBundle], path: &Path) -> Result<(), ExportError> {
    let entries: Vec<FeedEntry<'_>> = bundles
        .iter()
        .map(|bundle| FeedEntry {
            location_id: &bundle.location_id,
            location: &bundle.location_name,
            alerts: &bundle.alerts,
        })
        .collect();
    let document = serde_json::to_vec_pretty(&entries)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feed".to_string());
    let tmp = path.with_file_name(format!("{file_name}.tmp"));

    fs::write(&tmp, &document).map_err(|source| ExportError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), locations = bundles.len(), "alert feed exported");
    Ok(())
}
