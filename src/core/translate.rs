//! Purpose: Shared helpers for turning validated payloads into repository commands.
//! Exports: `ToCommand`, `split_list`, `parse_page_number`.
//! Role: Third pipeline stage; pure functions with no error path.
//! Invariants: Inputs are assumed valid; translation never re-validates and never fails.
//! Invariants: Translating the same payload twice yields equal commands.

/// Maps a validated payload (plus out-of-band context such as URL path ids) to a command.
pub trait ToCommand {
    type Context;
    type Command;

    fn to_command(&self, context: &Self::Context) -> Self::Command;
}

/// Splits a comma-joined filter into its non-empty tokens, preserving order and duplicates.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a decoded pagination value; empty means "let the repository pick".
pub fn parse_page_number(value: &str) -> Option<u64> {
    if value.is_empty() {
        return None;
    }
    let parsed = value.parse().ok();
    debug_assert!(
        parsed.is_some(),
        "pagination value {value:?} was not validated"
    );
    parsed
}
