// src/process/normalize.rs
use crate::config::LabelRule;

/// Positional fields of one log line; index encodes field identity.
pub type TokenRow = Vec<String>;

/// Strip the gateway's structural noise from `line` and split it on commas.
///
/// Quotes and braces go first so labels sitting against them still match,
/// then each label rule in order, then surrounding whitespace. Commas inside
/// values are not escaped by the gateway, so they split too.
pub fn normalize_line(line: &str, labels: &[LabelRule]) -> TokenRow {
    let mut cleaned: String = line
        .chars()
        .filter(|c| !matches!(c, '"' | '{' | '}'))
        .collect();
    for rule in labels {
        cleaned = rule.apply(&cleaned);
    }
    cleaned.trim().split(',').map(str::to_string).collect()
}
