//! Read-only loading of a generated routing table.
//!
//! Used to check what the gateway will see: point counts per list and the
//! highest point number, which sizes the gateway's point arrays.

use std::path::Path;

use serde::Serialize;

use super::TableDocument;
use crate::error::ReadTableError;

/// Point statistics of a routing table document.
/// Serialized as-is by `gtwtable summary --json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub generated_at: String,
    pub digital: usize,
    pub analog: usize,
    /// Entries the gateway subscribes to (outputs).
    pub subscribed: usize,
    /// Entries the gateway publishes (inputs).
    pub published: usize,
    pub max_digital_number: Option<u64>,
    pub max_analog_number: Option<u64>,
    /// Point numbers that are not unsigned integers.
    pub non_numeric: Vec<String>,
}

/// Load a routing table document from disk.
pub fn read_table(path: &Path) -> Result<TableDocument, ReadTableError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReadTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ReadTableError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Compute point statistics for a document.
pub fn summarize(document: &TableDocument) -> TableSummary {
    let mut summary = TableSummary {
        generated_at: document.config.table_data_time.clone(),
        digital: document.digital.len(),
        analog: document.analog.len(),
        ..Default::default()
    };

    let digital = document
        .digital
        .iter()
        .map(|p| (p.dpoint_number.as_str(), p.mqtt_subscribe.as_str()));
    let analog = document
        .analog
        .iter()
        .map(|p| (p.apoint_number.as_str(), p.mqtt_subscribe.as_str()));

    let max_digital = scan(digital, &mut summary);
    let max_analog = scan(analog, &mut summary);
    summary.max_digital_number = max_digital;
    summary.max_analog_number = max_analog;
    summary
}

fn scan<'a>(
    points: impl Iterator<Item = (&'a str, &'a str)>,
    summary: &mut TableSummary,
) -> Option<u64> {
    let mut max = None;

    for (number, subscribe) in points {
        if subscribe == "true" {
            summary.subscribed += 1;
        } else {
            summary.published += 1;
        }

        match number.parse::<u64>() {
            Ok(n) => max = max.max(Some(n)),
            Err(_) => summary.non_numeric.push(number.to_string()),
        }
    }

    max
}
