// src/process/mod.rs
pub mod assemble;
pub mod normalize;
pub mod reshape;

pub use assemble::{assemble, process_file, unified_header, write_rows, write_table, Table, TableStats};
pub use normalize::{normalize_line, TokenRow};
pub use reshape::{reshape_row, EnrichedRow};
