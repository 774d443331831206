//! Routing table document assembly and output.
//!
//! # Output Format
//!
//! ```text
//! {
//!   "TableConfig":   { "table_data_time": "2026-10-19 08:30:00" },
//!   "DPointRouting": [ { "dpoint_number", "mqtt_topic", "mqtt_subscribe", "value_mapping": [..] | "" } ],
//!   "APointRouting": [ { "apoint_number", "mqtt_topic", "mqtt_subscribe", "value_mapping": "<raw>" } ]
//! }
//! ```
//!
//! Every leaf is a string, booleans and mapping indexes included, which is
//! what the gateway's table loader expects.
//!
//! The file is written atomically: the document goes to a temporary file in
//! the destination directory and is renamed over the target only once it is
//! complete. The new file takes over the permissions of the table it
//! replaces, or gets `0644` when there was none, so a gateway running as
//! another user can still read it.

pub mod reader;

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{WriteError, WriteResult};
use crate::models::{MappingItem, RoutingEntry, RoutingTable, MAPPING_DELIMITER};

pub use reader::{read_table, summarize, TableSummary};

// =============================================================================
// Document Types
// =============================================================================

/// The routing table document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    #[serde(rename = "TableConfig")]
    pub config: TableConfig,
    #[serde(rename = "DPointRouting")]
    pub digital: Vec<DigitalPoint>,
    #[serde(rename = "APointRouting")]
    pub analog: Vec<AnalogPoint>,
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub table_data_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalPoint {
    pub dpoint_number: String,
    pub mqtt_topic: String,
    pub mqtt_subscribe: String,
    pub value_mapping: ValueMapping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogPoint {
    pub apoint_number: String,
    pub mqtt_topic: String,
    pub mqtt_subscribe: String,
    pub value_mapping: String,
}

/// Digital value mapping: decomposed labels, or the raw expression when
/// there is nothing to decompose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueMapping {
    List(Vec<MappingValue>),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingValue {
    pub value: String,
    pub mapp_to: String,
}

impl From<MappingItem> for MappingValue {
    fn from(item: MappingItem) -> Self {
        Self {
            value: item.value.to_string(),
            mapp_to: item.label,
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Split a value expression into `(index, label)` pairs.
///
/// `"off/on"` gives `[(0, "off"), (1, "on")]`. Labels are kept verbatim;
/// an empty expression gives no pairs.
pub fn decompose(expr: &str) -> Vec<MappingItem> {
    if expr.is_empty() {
        return Vec::new();
    }

    expr.split(MAPPING_DELIMITER)
        .enumerate()
        .map(|(position, label)| MappingItem::new(position, label))
        .collect()
}

fn subscribe_flag(entry: &RoutingEntry) -> String {
    entry.subscribe().to_string()
}

fn digital_point(entry: &RoutingEntry) -> DigitalPoint {
    let items = decompose(entry.value_expression());
    let value_mapping = if items.is_empty() {
        ValueMapping::Raw(entry.value_expression().to_string())
    } else {
        ValueMapping::List(items.into_iter().map(MappingValue::from).collect())
    };

    DigitalPoint {
        dpoint_number: entry.point_number().to_string(),
        mqtt_topic: entry.mqtt_topic().to_string(),
        mqtt_subscribe: subscribe_flag(entry),
        value_mapping,
    }
}

fn analog_point(entry: &RoutingEntry) -> AnalogPoint {
    AnalogPoint {
        apoint_number: entry.point_number().to_string(),
        mqtt_topic: entry.mqtt_topic().to_string(),
        mqtt_subscribe: subscribe_flag(entry),
        value_mapping: entry.value_expression().to_string(),
    }
}

/// Build the output document for a routing table.
pub fn to_document(table: &RoutingTable) -> TableDocument {
    TableDocument {
        config: TableConfig {
            table_data_time: table.generated_at().to_string(),
        },
        digital: table.digital().iter().map(digital_point).collect(),
        analog: table.analog().iter().map(analog_point).collect(),
    }
}

/// Serialize a routing table to JSON text (with a trailing newline).
pub fn to_json(table: &RoutingTable, pretty: bool) -> WriteResult<String> {
    let document = to_document(table);
    let mut json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    json.push('\n');
    Ok(json)
}

// =============================================================================
// Output
// =============================================================================

/// Write a routing table to `path`, replacing any existing file.
///
/// On error the target is left untouched and the temporary file is removed.
pub fn write_table(table: &RoutingTable, path: &Path, pretty: bool) -> WriteResult<()> {
    let json = to_json(table, pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(json.as_bytes()).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;
    apply_target_mode(tmp.as_file(), path).map_err(io_error)?;

    tmp.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

#[cfg(unix)]
const NEW_TABLE_MODE: u32 = 0o644;

/// Permissions of the table being replaced, or `0644` for a new one.
#[cfg(unix)]
fn apply_target_mode(file: &std::fs::File, target: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => std::fs::Permissions::from_mode(NEW_TABLE_MODE),
    };
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn apply_target_mode(_file: &std::fs::File, _target: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TableBuilder;
    use serde_json::json;

    fn table(entries: Vec<RoutingEntry>) -> RoutingTable {
        let mut builder = TableBuilder::new();
        for entry in entries {
            builder.push(entry);
        }
        builder.build_at("2026-10-19 08:30:00").0
    }

    #[test]
    fn test_decompose() {
        assert!(decompose("").is_empty());
        assert_eq!(
            decompose("A/B/C"),
            vec![
                MappingItem::new(0, "A"),
                MappingItem::new(1, "B"),
                MappingItem::new(2, "C"),
            ]
        );
    }

    #[test]
    fn test_decompose_keeps_tokens_verbatim() {
        let items = decompose(" off //on!");
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec![" off ", "", "on!"]);
        assert_eq!(decompose("single"), vec![MappingItem::new(0, "single")]);
    }

    #[test]
    fn test_digital_document_shape() {
        let table = table(vec![RoutingEntry::new("DI", "DI1", "sensors/temp", "low/med/high", 2)]);
        let value = serde_json::to_value(to_document(&table)).unwrap();

        assert_eq!(
            value,
            json!({
                "TableConfig": { "table_data_time": "2026-10-19 08:30:00" },
                "DPointRouting": [{
                    "dpoint_number": "DI1",
                    "mqtt_topic": "sensors/temp",
                    "mqtt_subscribe": "false",
                    "value_mapping": [
                        { "value": "0", "mapp_to": "low" },
                        { "value": "1", "mapp_to": "med" },
                        { "value": "2", "mapp_to": "high" }
                    ]
                }],
                "APointRouting": []
            })
        );
    }

    #[test]
    fn test_analog_mapping_never_decomposed() {
        let table = table(vec![
            RoutingEntry::new("AO", "AO1", "act/valve", "0-100", 2),
            RoutingEntry::new("AI", "AI1", "sensors/level", "low/high", 3),
        ]);
        let document = to_document(&table);

        assert_eq!(document.analog[0].apoint_number, "AO1");
        assert_eq!(document.analog[0].mqtt_subscribe, "true");
        assert_eq!(document.analog[0].value_mapping, "0-100");
        assert_eq!(document.analog[1].mqtt_subscribe, "false");
        assert_eq!(document.analog[1].value_mapping, "low/high");
    }

    #[test]
    fn test_empty_digital_mapping_is_scalar() {
        let table = table(vec![RoutingEntry::new("DO", "5", "plc/relay", "", 2)]);
        let value = serde_json::to_value(to_document(&table)).unwrap();

        assert_eq!(value["DPointRouting"][0]["value_mapping"], json!(""));
        assert_eq!(value["DPointRouting"][0]["mqtt_subscribe"], json!("true"));
    }

    #[test]
    fn test_section_order() {
        let json = to_json(&table(vec![]), false).unwrap();
        let config = json.find("TableConfig").unwrap();
        let digital = json.find("DPointRouting").unwrap();
        let analog = json.find("APointRouting").unwrap();
        assert!(config < digital && digital < analog);
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_write_table_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gtw_table.json");
        std::fs::write(&path, "old").unwrap();

        let table = table(vec![RoutingEntry::new("AI", "1", "a", "", 2)]);
        write_table(&table, &path, true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let document: TableDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(document, to_document(&table));

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_table_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gtw_table.json");
        write_table(&table(vec![]), &path, true).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_table_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gtw_table.json");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_table(&table(vec![]), &path, true).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_write_table_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("gtw_table.json");

        let err = write_table(&table(vec![]), &path, true).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert!(!path.exists());
    }
}
