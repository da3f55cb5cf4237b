//! Identifier extraction: find the document id inside pasted text.
//!
//! Users paste whatever they have: a full share link, a link with
//! tracking parameters, or just the bare id. The first 8-4-4-4-12
//! hex token in the text is the document identifier.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Canonical identifier pattern. Hex groups of exactly 8-4-4-4-12,
/// either case, hyphen separated.
const IDENTIFIER: &str =
    r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}";

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER).expect("identifier pattern is valid"));

/// A document identifier, exactly as it appeared in the input.
///
/// Case is preserved; the remote service receives the token verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the leftmost identifier in `raw`, or `None` if the text
/// contains none.
pub fn extract(raw: &str) -> Option<Identifier> {
    IDENTIFIER_RE
        .find(raw)
        .map(|m| Identifier(m.as_str().to_string()))
}
