//! Data row to routing entry.
//!
//! Looks up the four required columns by position and copies them into a
//! [`RoutingEntry`]. A row lacking any of them fails the whole conversion.

use crate::error::{MissingField, RowParseError};
use crate::models::{columns, RoutingEntry};
use crate::parser::{split_fields, ColumnIndex};

/// Turns data lines into routing entries using a resolved header.
#[derive(Debug, Clone, Copy)]
pub struct RowTransformer<'a> {
    index: &'a ColumnIndex,
}

impl<'a> RowTransformer<'a> {
    pub fn new(index: &'a ColumnIndex) -> Self {
        Self { index }
    }

    /// Transform one data line.
    ///
    /// `line` is the 1-based line number used in error messages. Every
    /// missing required field is collected before failing.
    pub fn transform(&self, line: usize, data_line: &str) -> Result<RoutingEntry, RowParseError> {
        let fields = split_fields(data_line);

        let mut missing = Vec::new();
        let mut take = |column: &'static str| match self.field(&fields, column) {
            Ok(value) => Some(value),
            Err(reason) => {
                missing.push(reason);
                None
            }
        };

        let point_number = take(columns::PLC_POINT);
        let operation = take(columns::OPERATION);
        let mqtt_topic = take(columns::MQTT_TOPIC);
        let mqtt_values = take(columns::MQTT_VALUES);

        match (point_number, operation, mqtt_topic, mqtt_values) {
            (Some(point_number), Some(operation), Some(mqtt_topic), Some(mqtt_values)) => Ok(
                RoutingEntry::new(operation, point_number, mqtt_topic, mqtt_values, line),
            ),
            _ => Err(RowParseError { line, missing }),
        }
    }

    fn field<'f>(&self, fields: &[&'f str], column: &'static str) -> Result<&'f str, MissingField> {
        let position = self
            .index
            .index_of(column)
            .ok_or(MissingField::NotInHeader(column))?;

        fields
            .get(position)
            .copied()
            .ok_or(MissingField::OutOfRange {
                column,
                position,
                fields: fields.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "plc point,operation,mqtt topic,mqtt values";

    #[test]
    fn test_digital_input_row() {
        let index = ColumnIndex::resolve(HEADER);
        let entry = RowTransformer::new(&index)
            .transform(2, "DI1,DI,sensors/temp,low/med/high")
            .unwrap();

        assert_eq!(entry.kind(), "DI");
        assert_eq!(entry.point_number(), "DI1");
        assert_eq!(entry.mqtt_topic(), "sensors/temp");
        assert_eq!(entry.value_expression(), "low/med/high");
        assert!(!entry.subscribe());
        assert_eq!(entry.line(), 2);
    }

    #[test]
    fn test_analog_output_row() {
        let index = ColumnIndex::resolve(HEADER);
        let entry = RowTransformer::new(&index)
            .transform(2, "AO1,AO,act/valve,0-100")
            .unwrap();

        assert_eq!(entry.kind(), "AO");
        assert!(entry.subscribe());
        assert_eq!(entry.value_expression(), "0-100");
    }

    #[test]
    fn test_columns_in_any_order() {
        let index = ColumnIndex::resolve("dev num,mqtt values,description,operation,mqtt topic,plc point");
        let entry = RowTransformer::new(&index)
            .transform(5, "3,off/on,pump relay,DO,plc/pump,17")
            .unwrap();

        assert_eq!(entry.point_number(), "17");
        assert_eq!(entry.kind(), "DO");
        assert_eq!(entry.mqtt_topic(), "plc/pump");
        assert_eq!(entry.value_expression(), "off/on");
    }

    #[test]
    fn test_empty_fields_are_present() {
        let index = ColumnIndex::resolve(HEADER);
        let entry = RowTransformer::new(&index).transform(2, ",,,").unwrap();

        assert_eq!(entry.kind(), "");
        assert_eq!(entry.point_number(), "");
        assert_eq!(entry.value_expression(), "");
    }

    #[test]
    fn test_short_row_fails() {
        let index = ColumnIndex::resolve(HEADER);
        let err = RowTransformer::new(&index)
            .transform(3, "DI1,DI,sensors/temp")
            .unwrap_err();

        assert_eq!(err.line, 3);
        assert_eq!(
            err.missing,
            vec![MissingField::OutOfRange {
                column: "mqtt values",
                position: 3,
                fields: 3,
            }]
        );
    }

    #[test]
    fn test_missing_column_reported_per_row() {
        let index = ColumnIndex::resolve("plc point,operation,mqtt topic");
        let err = RowTransformer::new(&index)
            .transform(2, "DI1,DI,sensors/temp,low/high")
            .unwrap_err();

        assert!(err.is_missing_column());
        assert_eq!(err.missing, vec![MissingField::NotInHeader("mqtt values")]);
    }

    #[test]
    fn test_all_missing_fields_collected() {
        let index = ColumnIndex::resolve(HEADER);
        let err = RowTransformer::new(&index).transform(9, "DI1").unwrap_err();

        let missing: Vec<_> = err.missing.iter().map(|m| m.column()).collect();
        assert_eq!(missing, vec!["operation", "mqtt topic", "mqtt values"]);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let index = ColumnIndex::resolve(HEADER);
        let entry = RowTransformer::new(&index)
            .transform(2, "AI4,AI,plc/level,0-10,spare,spare")
            .unwrap();

        assert_eq!(entry.value_expression(), "0-10");
    }

    #[test]
    fn test_unrecognized_kind_still_parses() {
        let index = ColumnIndex::resolve(HEADER);
        let entry = RowTransformer::new(&index).transform(2, "X1,XX,t,v").unwrap();

        assert_eq!(entry.kind(), "XX");
        assert_eq!(entry.point_kind(), None);
    }
}
