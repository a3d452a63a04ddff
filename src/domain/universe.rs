//! Exchange whitelist and recipient list parsing.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("duplicate entry: {0}")]
    Duplicate(String),
}

/// Parse a comma separated exchange list, e.g. `"NYSE, nasdaq,NSE"`.
///
/// Entries are trimmed and upper-cased; empty tokens and duplicates are errors.
pub fn parse_exchanges(input: &str) -> Result<Vec<String>, ListError> {
    parse_list(input, |s| s.to_uppercase())
}

/// Parse a comma separated list of email recipients. Case is preserved.
pub fn parse_recipients(input: &str) -> Result<Vec<String>, ListError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_list(input, str::to_string)
}

fn parse_list(input: &str, normalise: impl Fn(&str) -> String) -> Result<Vec<String>, ListError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ListError::EmptyToken);
        }
        let entry = normalise(trimmed);
        if !seen.insert(entry.clone()) {
            return Err(ListError::Duplicate(entry));
        }
        entries.push(entry);
    }

    Ok(entries)
}
