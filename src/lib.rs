//! Converts AWS IoT Sidewalk gateway logs into a cleaned CSV table and
//! per-radio KML point layers.
//!
//! Each log line is normalized into positional fields, its Base64 payload
//! is decoded into a content code and fixed-point coordinates, and the rows
//! are written under a header sized from the widest row. The table is then
//! read back and its points grouped by content code.

pub mod config;
pub mod decode;
pub mod error;
pub mod geo;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod select;

pub use config::Config;
pub use pipeline::{run, RunSummary};
