pub mod payload;
pub mod record;

pub use payload::{decode_payload, payload_to_hex_string};
pub use record::{format_degrees, DecodedPayload};
