// src/decode/record.rs

/// Scale of the fixed-point coordinates: micro-degrees.
pub const COORD_SCALE: f64 = 1_000_000.0;

/// The fixed record carried in a decoded payload.
///
/// Layout (hex-byte token indexes):
///  - `0`      content code, kept as the raw two-digit token
///  - `1..=4`  latitude, big-endian i32 micro-degrees
///  - `5..=8`  longitude, big-endian i32 micro-degrees
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPayload {
    pub content_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DecodedPayload {
    /// Read the record from a space-separated hex-byte string.
    ///
    /// Short input is a degraded record, never an error: a coordinate whose
    /// four bytes are missing (or do not parse as hex) is `None`.
    pub fn from_hex(hex: &str) -> Self {
        let tokens: Vec<&str> = hex.split_whitespace().collect();
        Self::from_tokens(&tokens)
    }

    pub fn from_tokens(tokens: &[&str]) -> Self {
        Self {
            content_code: tokens.first().map(|t| t.to_string()).unwrap_or_default(),
            latitude: tokens.get(1..5).and_then(fixed_point),
            longitude: tokens.get(5..9).and_then(fixed_point),
        }
    }

    /// The three derived column values, in column order.
    pub fn to_fields(&self) -> [String; 3] {
        [
            self.content_code.clone(),
            format_degrees(self.latitude),
            format_degrees(self.longitude),
        ]
    }
}

/// Assemble four big-endian hex bytes into a signed 32-bit value and scale
/// it to degrees.
fn fixed_point(tokens: &[&str]) -> Option<f64> {
    let mut raw: u32 = 0;
    for t in tokens {
        raw = (raw << 8) | u8::from_str_radix(t, 16).ok()? as u32;
    }
    // two's complement: top bit set means raw - 2^32
    Some(raw as i32 as f64 / COORD_SCALE)
}

/// Render a coordinate for the processed table. Absent values are empty
/// cells; whole degrees keep a `.0` so the column reads as decimal.
pub fn format_degrees(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 => format!("{:.1}", v),
        Some(v) => v.to_string(),
    }
}
