//! Accumulates routing entries into a [`RoutingTable`].
//!
//! The builder is passed explicitly through the conversion and consumed by
//! [`TableBuilder::build`]; nothing is shared between runs.

use std::fmt::Write;

use crate::logs::log_warning;
use crate::models::{ConversionReport, DroppedRow, RoutingEntry, RoutingTable};

/// Default `table_data_time` format (local time).
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of [`TableBuilder::push`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Digital,
    Analog,
    /// Operation is not DI/DO/AI/AO; the entry is left out.
    Dropped,
}

/// Builder for the digital and analog routing lists.
#[derive(Debug, Default)]
pub struct TableBuilder {
    digital: Vec<RoutingEntry>,
    analog: Vec<RoutingEntry>,
    report: ConversionReport,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to its bucket, or drop it when its kind is unknown.
    pub fn push(&mut self, entry: RoutingEntry) -> Placement {
        match entry.point_kind() {
            Some(kind) if kind.is_digital() => {
                self.digital.push(entry);
                self.report.digital += 1;
                Placement::Digital
            }
            Some(_) => {
                self.analog.push(entry);
                self.report.analog += 1;
                Placement::Analog
            }
            None => {
                log_warning(format!(
                    "line {}: operation '{}' is not DI/DO/AI/AO, point '{}' skipped",
                    entry.line(),
                    entry.kind(),
                    entry.point_number()
                ));
                self.report.dropped.push(DroppedRow {
                    line: entry.line(),
                    kind: entry.kind().to_string(),
                });
                Placement::Dropped
            }
        }
    }

    /// Count a data line that was read.
    pub fn record_line(&mut self, blank: bool) {
        self.report.data_lines += 1;
        if blank {
            self.report.blank_lines += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.digital.len() + self.analog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finish the table, stamping it with the current local time.
    ///
    /// An invalid strftime format falls back to [`DEFAULT_TIME_FORMAT`].
    pub fn build(self, time_format: &str) -> (RoutingTable, ConversionReport) {
        let now = chrono::Local::now();
        let mut generated_at = String::new();
        if write!(generated_at, "{}", now.format(time_format)).is_err() {
            log_warning(format!("invalid time format '{}', using default", time_format));
            generated_at = now.format(DEFAULT_TIME_FORMAT).to_string();
        }
        self.build_at(generated_at)
    }

    /// Finish the table with an explicit timestamp.
    pub fn build_at(self, generated_at: impl Into<String>) -> (RoutingTable, ConversionReport) {
        let table = RoutingTable::new(self.digital, self.analog, generated_at.into());
        (table, self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, point: &str, line: usize) -> RoutingEntry {
        RoutingEntry::new(kind, point, format!("plc/{}", point), "", line)
    }

    #[test]
    fn test_partition_keeps_file_order() {
        let mut builder = TableBuilder::new();
        assert_eq!(builder.push(entry("DI", "1", 2)), Placement::Digital);
        assert_eq!(builder.push(entry("AI", "2", 3)), Placement::Analog);
        assert_eq!(builder.push(entry("DO", "3", 4)), Placement::Digital);
        assert_eq!(builder.push(entry("AO", "4", 5)), Placement::Analog);

        let (table, report) = builder.build_at("now");
        let digital: Vec<_> = table.digital().iter().map(|e| e.point_number()).collect();
        let analog: Vec<_> = table.analog().iter().map(|e| e.point_number()).collect();

        assert_eq!(digital, vec!["1", "3"]);
        assert_eq!(analog, vec!["2", "4"]);
        assert_eq!(report.digital, 2);
        assert_eq!(report.analog, 2);
        assert_eq!(table.generated_at(), "now");
    }

    #[test]
    fn test_unknown_kind_dropped() {
        let mut builder = TableBuilder::new();
        assert_eq!(builder.push(entry("XX", "9", 7)), Placement::Dropped);
        assert_eq!(builder.push(entry("di", "10", 8)), Placement::Dropped);
        assert!(builder.is_empty());

        let (table, report) = builder.build_at("now");
        assert!(table.is_empty());
        assert_eq!(
            report.dropped,
            vec![
                DroppedRow { line: 7, kind: "XX".to_string() },
                DroppedRow { line: 8, kind: "di".to_string() },
            ]
        );
    }

    #[test]
    fn test_line_counters() {
        let mut builder = TableBuilder::new();
        builder.record_line(false);
        builder.record_line(true);
        let (_, report) = builder.build_at("now");
        assert_eq!(report.data_lines, 2);
        assert_eq!(report.blank_lines, 1);
    }

    #[test]
    fn test_build_uses_time_format() {
        let (table, _) = TableBuilder::new().build("%Y");
        assert_eq!(table.generated_at().len(), 4);
        assert!(table.generated_at().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_invalid_time_format_falls_back() {
        let (table, _) = TableBuilder::new().build("%Q%");
        assert_eq!(table.generated_at().len(), "2026-01-01 00:00:00".len());
    }
}
