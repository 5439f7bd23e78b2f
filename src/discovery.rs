//! Bootstrap discovery: extract investment ids from page markup.

use std::collections::HashSet;

/// Attribute marking an element whose timer should be tracked.
pub const INVESTMENT_ID_MARKER: &str = "data-investment-id";

/// Scans markup for `data-investment-id="…"` markers and returns the ids in
/// document order, deduplicated, empty values skipped. This is the sole
/// bootstrap input besides explicit registration.
pub fn discover_investment_ids(markup: &str) -> Vec<String> {
    let needle = format!("{INVESTMENT_ID_MARKER}=\"");
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    let mut rest = markup;
    while let Some(pos) = rest.find(&needle) {
        rest = &rest[pos + needle.len()..];
        let Some(end) = rest.find('"') else { break };
        let id = &rest[..end];
        rest = &rest[end + 1..];

        if !id.is_empty() && seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    }

    ids
}
