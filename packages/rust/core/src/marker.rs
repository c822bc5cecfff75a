//! Marker detection: decides whether a comment block is documentation payload.

use rstextract_shared::{DEFAULT_MARKER, Result, RstExtractError};

/// The token that, alone on the first line of a comment block, flags the rest
/// of the block as payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    token: String,
}

impl Marker {
    /// Validate and wrap a marker token.
    ///
    /// The token is compared against a whitespace-trimmed line, so a token
    /// that is empty or contains whitespace could never match.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(RstExtractError::validation("marker token must not be empty"));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(RstExtractError::validation(format!(
                "marker token {token:?} must not contain whitespace"
            )));
        }
        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Return the payload of `text` if its first line is the marker.
    ///
    /// Only the first line is trimmed; the payload is everything after the
    /// first newline, verbatim, and empty when there is no newline.
    pub fn detect<'t>(&self, text: &'t str) -> Option<&'t str> {
        let (head, payload) = text.split_once('\n').unwrap_or((text, ""));
        (head.trim() == self.token).then_some(payload)
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            token: DEFAULT_MARKER.to_string(),
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token)
    }
}
