//! High-level conversion API: CSV project file to routing table.
//!
//! # Example
//!
//! ```rust,ignore
//! use gtwtable::{convert_and_write, ConvertOptions};
//! use std::path::Path;
//!
//! let conversion = convert_and_write(
//!     Path::new("project.csv"),
//!     Path::new("gtw_table.json"),
//!     &ConvertOptions::default(),
//! )?;
//! println!("{} points routed", conversion.table.len());
//! ```

use std::env;
use std::path::Path;

use super::builder::{TableBuilder, DEFAULT_TIME_FORMAT};
use super::row::RowTransformer;
use crate::error::ConvertResult;
use crate::logs::{log_debug_indent, log_info, log_success, log_warning, LogLevel};
use crate::models::{columns, ConversionReport, RoutingTable};
use crate::parser::{read_input, split_lines, ColumnIndex};
use crate::writer::write_table;

/// Options for a conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// strftime format of `table_data_time`
    pub time_format: String,

    /// Write single-line JSON instead of pretty-printed
    pub compact: bool,

    /// Log level requested through the environment, if any
    pub log_level: Option<LogLevel>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            compact: false,
            log_level: None,
        }
    }
}

impl ConvertOptions {
    /// Defaults overridden by `GTWTABLE_*` variables (a `.env` file is
    /// loaded first when present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ConvertOptions::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(format) = lookup("GTWTABLE_TIME_FORMAT").filter(|f| !f.is_empty()) {
            options.time_format = format;
        }
        if let Some(compact) = lookup("GTWTABLE_COMPACT") {
            options.compact = matches!(
                compact.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(level) = lookup("GTWTABLE_LOG") {
            options.log_level = LogLevel::from_name(&level);
            if options.log_level.is_none() {
                log_warning(format!("GTWTABLE_LOG: unknown level '{}'", level));
            }
        }

        options
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

/// Input file information
#[derive(Debug, Clone)]
pub struct InputInfo {
    /// Encoding the file was decoded from; `None` for text given directly
    pub encoding: Option<String>,
    pub headers: Vec<String>,
    pub data_lines: usize,
}

/// Result of a conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub table: RoutingTable,
    pub report: ConversionReport,
    pub input: InputInfo,
}

/// Convert decoded CSV text.
///
/// Fails on the first data row lacking a required field; blank lines are
/// skipped and rows with an unknown operation are left out.
pub fn convert_str(content: &str, options: &ConvertOptions) -> ConvertResult<Conversion> {
    let (header_line, data_lines) = split_lines(content).unwrap_or(("", Vec::new()));

    let index = ColumnIndex::resolve(header_line);
    log_info(format!("📋 Header has {} columns", index.len()));
    for (i, col) in index.columns().iter().enumerate() {
        log_debug_indent(format!("[{:2}] '{}'", i, col), 1);
    }
    for name in index.duplicates() {
        log_warning(format!(
            "column '{}' appears more than once, position {} is used",
            name,
            index.index_of(name).unwrap_or_default()
        ));
    }
    if data_lines.is_empty() {
        log_warning("No data rows found");
    }

    let transformer = RowTransformer::new(&index);
    let mut builder = TableBuilder::new();

    for line in &data_lines {
        builder.record_line(line.is_blank());
        if line.is_blank() {
            continue;
        }

        let entry = transformer.transform(line.number, line.text)?;
        log_debug_indent(
            format!(
                "{} : {} : {} : {}",
                entry.kind(),
                entry.point_number(),
                entry.mqtt_topic(),
                entry.value_expression()
            ),
            1,
        );
        builder.push(entry);
    }

    let (table, report) = builder.build(&options.time_format);
    print_report(&report);

    Ok(Conversion {
        table,
        report,
        input: InputInfo {
            encoding: None,
            headers: index.columns().to_vec(),
            data_lines: data_lines.len(),
        },
    })
}

/// Read, decode and convert a CSV project file.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> ConvertResult<Conversion> {
    log_info(format!("📖 Reading {}", path.display()));
    let input = read_input(path)?;
    log_success(format!("Detected encoding: {}", input.encoding));

    let mut conversion = convert_str(&input.content, options)?;
    conversion.input.encoding = Some(input.encoding);
    Ok(conversion)
}

/// Convert a CSV project file and write the routing table.
///
/// Nothing is written when the conversion fails.
pub fn convert_and_write(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> ConvertResult<Conversion> {
    let conversion = convert_file(input, options)?;

    log_info(format!("💾 Writing {}", output.display()));
    if let Err(e) = write_table(&conversion.table, output, !options.compact) {
        log_warning(format!(
            "{} points were converted but the table was not written",
            conversion.table.len()
        ));
        return Err(e.into());
    }
    log_success(format!("Routing table written to {}", output.display()));

    Ok(conversion)
}

/// Names of required columns missing from a header, for diagnostics.
pub fn missing_columns(index: &ColumnIndex) -> Vec<&'static str> {
    index.missing(&columns::REQUIRED)
}

fn print_report(report: &ConversionReport) {
    log_success(format!(
        "{} digital and {} analog points",
        report.digital, report.analog
    ));
    if report.blank_lines > 0 {
        log_info(format!("{} blank line(s) skipped", report.blank_lines));
    }
    if !report.dropped.is_empty() {
        log_warning(format!(
            "{} row(s) with unknown operation left out",
            report.dropped.len()
        ));
    }
}
