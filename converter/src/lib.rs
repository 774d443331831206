//! # gtwtable - PLC point CSV to MQTT gateway routing table
//!
//! gtwtable reads the CSV project sheet describing PLC I/O points and
//! produces the routing table the gateway uses to move digital and analog
//! point values to and from MQTT topics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Header    │────▶│    Rows     │────▶│ Table JSON  │
//! │  (ISO/UTF8) │     │  (columns)  │     │(DI/DO/AI/AO)│     │  (atomic)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gtwtable::{convert_and_write, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions::from_env();
//! let conversion = convert_and_write(Path::new("project.csv"), Path::new("gtw_table.json"), &options)?;
//! println!("{} digital, {} analog", conversion.report.digital, conversion.report.analog);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`logs`] - Operator log output
//! - [`models`] - Domain models (RoutingEntry, RoutingTable, PointKind)
//! - [`parser`] - Input decoding and header resolution
//! - [`transform`] - Row transformation, table building, pipeline
//! - [`writer`] - Document assembly, atomic output, table summary

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod writer;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError,
    InputError,
    MissingField,
    ReadTableError,
    RowParseError,
    WriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ConversionReport,
    DroppedRow,
    MappingItem,
    PointKind,
    RoutingEntry,
    RoutingTable,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_input,
    read_input,
    ColumnIndex,
    CsvInput,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    convert_and_write,
    convert_file,
    convert_str,
    missing_columns,
    Conversion,
    ConvertOptions,
    InputInfo,
    RowTransformer,
    TableBuilder,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use writer::{
    decompose,
    read_table,
    summarize,
    to_document,
    to_json,
    write_table,
    TableDocument,
    TableSummary,
};
