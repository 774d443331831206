//! Domain models for the gateway table converter.
//!
//! - [`PointKind`] - DI / DO / AI / AO point classification
//! - [`RoutingEntry`] - One routed point taken from a CSV row
//! - [`MappingItem`] - One `(index, label)` pair of a digital value mapping
//! - [`RoutingTable`] - Digital and analog routing lists plus generation time
//! - [`ConversionReport`] - Counters collected while converting

// =============================================================================
// CSV Column Names
// =============================================================================

/// Column names of the PLC project sheet.
///
/// Only the four `REQUIRED` columns are read; the other `LAYOUT` columns
/// describe the device wiring and are ignored by the conversion.
pub mod columns {
    pub const DEV_NUMBER: &str = "dev num";
    pub const DEV_TYPE: &str = "dev type";
    pub const DEV_INTERFACE: &str = "port / address";
    pub const DEV_CHANNELS: &str = "channels";
    pub const DEV_CHANNELS_DESCRIPTION: &str = "channels description";
    pub const PLC_POINT: &str = "plc point";
    pub const OPERATION: &str = "operation";
    pub const DESCRIPTION: &str = "description";
    pub const MQTT_TOPIC: &str = "mqtt topic";
    pub const MQTT_VALUES: &str = "mqtt values";

    /// Columns every data row must provide.
    pub const REQUIRED: [&str; 4] = [PLC_POINT, OPERATION, MQTT_TOPIC, MQTT_VALUES];

    /// All columns of the project sheet, in sheet order.
    pub const LAYOUT: [&str; 10] = [
        DEV_NUMBER,
        DEV_TYPE,
        DEV_INTERFACE,
        DEV_CHANNELS,
        DEV_CHANNELS_DESCRIPTION,
        PLC_POINT,
        OPERATION,
        DESCRIPTION,
        MQTT_TOPIC,
        MQTT_VALUES,
    ];

    pub fn is_required(name: &str) -> bool {
        REQUIRED.contains(&name)
    }

    /// Whether `name` belongs to the project sheet layout (exact match).
    pub fn is_known(name: &str) -> bool {
        LAYOUT.contains(&name)
    }
}

/// Field delimiter of the CSV project file.
pub const FIELD_DELIMITER: char = ',';

/// Delimiter between labels of a digital value mapping (`off/on`).
pub const MAPPING_DELIMITER: char = '/';

// =============================================================================
// Point Kind
// =============================================================================

/// Point type taken from the `operation` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// Digital input, published to MQTT.
    DigitalInput,
    /// Digital output, written from MQTT.
    DigitalOutput,
    /// Analog input, published to MQTT.
    AnalogInput,
    /// Analog output, written from MQTT.
    AnalogOutput,
}

impl PointKind {
    /// Parse an operation code. Exact and case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DI" => Some(Self::DigitalInput),
            "DO" => Some(Self::DigitalOutput),
            "AI" => Some(Self::AnalogInput),
            "AO" => Some(Self::AnalogOutput),
            _ => None,
        }
    }

    /// Convert to operation code.
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::DigitalInput => "DI",
            Self::DigitalOutput => "DO",
            Self::AnalogInput => "AI",
            Self::AnalogOutput => "AO",
        }
    }

    pub fn is_digital(&self) -> bool {
        matches!(self, Self::DigitalInput | Self::DigitalOutput)
    }

    pub fn is_analog(&self) -> bool {
        !self.is_digital()
    }

    /// Outputs are driven from MQTT, so the gateway subscribes to their topic.
    pub fn subscribes(&self) -> bool {
        matches!(self, Self::DigitalOutput | Self::AnalogOutput)
    }
}

impl std::fmt::Display for PointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_code())
    }
}

// =============================================================================
// Routing Entry
// =============================================================================

/// One point routed between the PLC and an MQTT topic.
///
/// All text fields are copied verbatim from the CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEntry {
    kind: String,
    point_number: String,
    mqtt_topic: String,
    value_expression: String,
    subscribe: bool,
    line: usize,
}

impl RoutingEntry {
    /// Build an entry; `subscribe` is derived from the operation code.
    pub fn new(
        kind: impl Into<String>,
        point_number: impl Into<String>,
        mqtt_topic: impl Into<String>,
        value_expression: impl Into<String>,
        line: usize,
    ) -> Self {
        let kind = kind.into();
        let subscribe = PointKind::from_code(&kind).is_some_and(|k| k.subscribes());
        Self {
            kind,
            point_number: point_number.into(),
            mqtt_topic: mqtt_topic.into(),
            value_expression: value_expression.into(),
            subscribe,
            line,
        }
    }

    /// Operation field as found in the row.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Recognized point kind, `None` for any other operation text.
    pub fn point_kind(&self) -> Option<PointKind> {
        PointKind::from_code(&self.kind)
    }

    pub fn point_number(&self) -> &str {
        &self.point_number
    }

    pub fn mqtt_topic(&self) -> &str {
        &self.mqtt_topic
    }

    pub fn value_expression(&self) -> &str {
        &self.value_expression
    }

    pub fn subscribe(&self) -> bool {
        self.subscribe
    }

    /// Source line in the CSV file (header is line 1).
    pub fn line(&self) -> usize {
        self.line
    }
}

// =============================================================================
// Value Mapping
// =============================================================================

/// One `(index, label)` pair of a digital value mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingItem {
    pub value: usize,
    pub label: String,
}

impl MappingItem {
    pub fn new(value: usize, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

// =============================================================================
// Routing Table
// =============================================================================

/// The complete routing table handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    digital: Vec<RoutingEntry>,
    analog: Vec<RoutingEntry>,
    generated_at: String,
}

impl RoutingTable {
    pub(crate) fn new(
        digital: Vec<RoutingEntry>,
        analog: Vec<RoutingEntry>,
        generated_at: String,
    ) -> Self {
        Self {
            digital,
            analog,
            generated_at,
        }
    }

    /// DI and DO entries in file order.
    pub fn digital(&self) -> &[RoutingEntry] {
        &self.digital
    }

    /// AI and AO entries in file order.
    pub fn analog(&self) -> &[RoutingEntry] {
        &self.analog
    }

    /// Generation timestamp (local time).
    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    pub fn len(&self) -> usize {
        self.digital.len() + self.analog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Conversion Report
// =============================================================================

/// A row left out of the table because its operation is not DI/DO/AI/AO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub line: usize,
    pub kind: String,
}

/// Counters collected while converting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Data lines read, blank ones included.
    pub data_lines: usize,
    /// Empty lines skipped without validation.
    pub blank_lines: usize,
    pub digital: usize,
    pub analog: usize,
    /// Rows with an unrecognized operation.
    pub dropped: Vec<DroppedRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_kind_codes() {
        for code in ["DI", "DO", "AI", "AO"] {
            let kind = PointKind::from_code(code).unwrap();
            assert_eq!(kind.to_code(), code);
        }
        assert_eq!(PointKind::from_code("di"), None);
        assert_eq!(PointKind::from_code(" DI"), None);
        assert_eq!(PointKind::from_code("XX"), None);
    }

    #[test]
    fn test_sheet_columns() {
        assert!(columns::is_known("dev num"));
        assert!(columns::is_known("description"));
        assert!(!columns::is_required("description"));
        assert!(columns::is_required("mqtt values"));
        assert!(!columns::is_known("MQTT values"));
        assert!(!columns::is_known(" plc point"));
        assert!(columns::REQUIRED.iter().all(|name| columns::is_known(name)));
    }

    #[test]
    fn test_subscribe_only_for_outputs() {
        assert!(!RoutingEntry::new("DI", "1", "t", "", 2).subscribe());
        assert!(RoutingEntry::new("DO", "1", "t", "", 2).subscribe());
        assert!(!RoutingEntry::new("AI", "1", "t", "", 2).subscribe());
        assert!(RoutingEntry::new("AO", "1", "t", "", 2).subscribe());
        assert!(!RoutingEntry::new("XX", "1", "t", "", 2).subscribe());
    }

    #[test]
    fn test_digital_and_analog_partition() {
        assert!(PointKind::DigitalInput.is_digital());
        assert!(PointKind::DigitalOutput.is_digital());
        assert!(PointKind::AnalogInput.is_analog());
        assert!(PointKind::AnalogOutput.is_analog());
    }

    #[test]
    fn test_entry_keeps_fields_verbatim() {
        let entry = RoutingEntry::new("DO", " 07", "plc/relay 1", "off/ on", 3);
        assert_eq!(entry.point_number(), " 07");
        assert_eq!(entry.mqtt_topic(), "plc/relay 1");
        assert_eq!(entry.value_expression(), "off/ on");
        assert_eq!(entry.point_kind(), Some(PointKind::DigitalOutput));
        assert_eq!(entry.line(), 3);
    }
}
