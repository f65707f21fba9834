// src/config.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Labels the gateway prefixes onto field values, in removal order.
pub const DEFAULT_LABELS: &[&str] = &[
    "MessageId:",
    "WirelessDeviceId:",
    "PayloadData:",
    "WirelessMetadata:",
    "Sidewalk:",
    "CmdExStatus:",
    "MessageType:",
    "NackExStatus:",
    "SidewalkId:",
    "Timestamp:",
];

/// Column names of the raw log, before the derived columns go in.
pub const BASE_HEADER: &[&str] = &[
    "Date/Time",
    "MessageId:",
    "WirelessDeviceId:",
    "PayloadData:",
    "WirelessMetadata:",
    "Msg Type:",
    " ",
    "Seq Number:",
    "SidewalkId:",
    "Timestamp:",
    "Rule:",
];

pub const DERIVED_COLUMNS: [&str; 3] = ["Payload Content", "Latitude", "Longitude"];

const SHADED_DOT: &str = "http://maps.google.com/mapfiles/kml/shapes/shaded_dot.png";

/// How one label is stripped from a line.
#[derive(Debug, Clone)]
pub enum LabelRule {
    /// Remove every occurrence of the exact substring.
    Literal(String),
    /// Remove every match of the pattern.
    Pattern(Regex),
}

impl LabelRule {
    pub fn literal(label: impl Into<String>) -> Self {
        LabelRule::Literal(label.into())
    }

    pub fn apply(&self, line: &str) -> String {
        match self {
            LabelRule::Literal(label) => line.replace(label.as_str(), ""),
            LabelRule::Pattern(re) => re.replace_all(line, "").into_owned(),
        }
    }
}

/// Column positions the reshaper and grouper rely on.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Payload column in a normalized row; derived columns follow it.
    pub payload: usize,
    /// Column removed after the derived columns are inserted.
    pub dropped: usize,
    pub content_code: usize,
    pub latitude: usize,
    pub longitude: usize,
    pub timestamp: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            payload: 3,
            dropped: 9,
            content_code: 4,
            latitude: 5,
            longitude: 6,
            timestamp: 11,
        }
    }
}

/// Visual style of one point group. `color` is KML `aabbggrr`.
#[derive(Debug, Clone)]
pub struct GroupStyle {
    pub code: String,
    pub suffix: String,
    pub document_name: String,
    pub color: String,
    pub icon_href: String,
    pub scale: f64,
}

impl GroupStyle {
    fn dot(code: &str, suffix: &str, color: &str) -> Self {
        Self {
            code: code.to_string(),
            suffix: suffix.to_string(),
            document_name: format!("Payload Content {} - {}", code, suffix),
            color: color.to_string(),
            icon_href: SHADED_DOT.to_string(),
            scale: 1.0,
        }
    }
}

static DEFAULT_GROUPS: Lazy<Vec<GroupStyle>> = Lazy::new(|| {
    vec![
        GroupStyle::dot("01", "BLE", "ff00ffff"),
        GroupStyle::dot("02", "FSK", "ffffff00"),
        GroupStyle::dot("03", "CSS", "ff0000ff"),
    ]
});

/// Everything the pipeline treats as fixed input format knowledge.
#[derive(Debug, Clone)]
pub struct Config {
    pub labels: Vec<LabelRule>,
    pub base_header: Vec<String>,
    pub derived_columns: [String; 3],
    pub layout: Layout,
    pub groups: Vec<GroupStyle>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| LabelRule::literal(*l)).collect(),
            base_header: BASE_HEADER.iter().map(|s| s.to_string()).collect(),
            derived_columns: DERIVED_COLUMNS.map(String::from),
            layout: Layout::default(),
            groups: DEFAULT_GROUPS.clone(),
        }
    }
}

impl Config {
    /// Base header with the derived column names spliced in after the payload column.
    pub fn inserted_header(&self) -> Vec<String> {
        let split = self.layout.payload + 1;
        let mut header = Vec::with_capacity(self.base_header.len() + 3);
        header.extend(self.base_header.iter().take(split).cloned());
        header.extend(self.derived_columns.iter().cloned());
        header.extend(self.base_header.iter().skip(split).cloned());
        header
    }

    pub fn group(&self, code: &str) -> Option<&GroupStyle> {
        self.groups.iter().find(|g| g.code == code)
    }
}
