//! Purpose: Provide the JSON body decode entrypoint and failure categories.
//! Exports: `from_slice`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that keeps serde_json details out of payload code.
//! Invariants: Syntax-level failures and shape-level failures stay distinguishable.
//! Notes: Error mapping is done by callsites so domain context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    /// Not JSON at all (bad token, trailing garbage).
    Syntax,
    /// Input ended mid-document.
    Eof,
    /// Well-formed JSON whose shape does not fit the target type.
    Data,
    Io,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Io => "io",
        }
    }

    /// True when the bytes were not a JSON document.
    pub fn is_malformed(self) -> bool {
        !matches!(self, ParseFailureCategory::Data)
    }
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(input)
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}; at line {} column {}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}
