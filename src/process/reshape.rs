// src/process/reshape.rs
use tracing::trace;

use crate::{
    config::Layout,
    decode::{payload_to_hex_string, DecodedPayload},
    error::PayloadError,
    process::normalize::TokenRow,
};

/// A normalized row with its payload decoded and the derived columns
/// spliced in after the payload column.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub fields: Vec<String>,
    /// Set when the payload field was present but would not decode; the
    /// field then keeps its raw text and the derived columns are empty.
    pub decode_error: Option<PayloadError>,
}

/// Decode the payload column of `row` and insert content code, latitude and
/// longitude right after it. Never fails: short rows, empty payloads and
/// undecodable payloads all get three empty derived fields.
pub fn reshape_row(mut row: TokenRow, layout: &Layout) -> EnrichedRow {
    let at = layout.payload;
    let mut decode_error = None;

    let decoded = row
        .get(at)
        .filter(|p| !p.is_empty())
        .map(|p| payload_to_hex_string(p));

    let derived: [String; 3] = match decoded {
        Some(Ok(hex)) => {
            let record = DecodedPayload::from_hex(&hex);
            trace!(?record, "payload record");
            row[at] = hex;
            record.to_fields()
        }
        Some(Err(e)) => {
            decode_error = Some(e);
            Default::default()
        }
        None => Default::default(),
    };

    let insert_at = (at + 1).min(row.len());
    row.splice(insert_at..insert_at, derived);

    EnrichedRow {
        fields: row,
        decode_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> TokenRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decodes_and_inserts_after_payload() {
        let out = reshape_row(
            row(&["t", "m", "d", "MDEwMjAzMDQwNTA2MDcwODA5MEEwQg==", "meta"]),
            &Layout::default(),
        );
        assert_eq!(out.decode_error, None);
        assert_eq!(
            out.fields,
            row(&[
                "t",
                "m",
                "d",
                "01 02 03 04 05 06 07 08 09 0a 0b",
                "01",
                "33.752069",
                "101.124105",
                "meta",
            ])
        );
    }

    #[test]
    fn malformed_payload_keeps_raw_field() {
        let out = reshape_row(row(&["t", "m", "d", "!!!not-base64!!!", "x"]), &Layout::default());
        assert!(matches!(
            out.decode_error,
            Some(PayloadError::InvalidBase64(_))
        ));
        assert_eq!(
            out.fields,
            row(&["t", "m", "d", "!!!not-base64!!!", "", "", "", "x"])
        );

        let copy = out.clone();
        assert_eq!(copy, out);
        assert_eq!(copy.decode_error, out.decode_error);
    }

    #[test]
    fn short_payload_has_empty_coordinates() {
        // "0102"
        let out = reshape_row(row(&["t", "m", "d", "MDEwMg=="]), &Layout::default());
        assert_eq!(out.fields, row(&["t", "m", "d", "01 02", "01", "", ""]));
    }

    #[test]
    fn empty_payload_is_not_decoded() {
        let out = reshape_row(row(&["t", "m", "d", "", "x"]), &Layout::default());
        assert_eq!(out.decode_error, None);
        assert_eq!(out.fields, row(&["t", "m", "d", "", "", "", "", "x"]));
    }

    #[test]
    fn short_rows_get_empty_fields_appended() {
        let out = reshape_row(row(&["a", "b"]), &Layout::default());
        assert_eq!(out.fields, row(&["a", "b", "", "", ""]));

        let out = reshape_row(row(&[""]), &Layout::default());
        assert_eq!(out.fields, row(&["", "", "", ""]));
    }
}
