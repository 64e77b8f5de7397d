// ABOUTME: Error types for the scour extractor: ErrorCode enum plus ExtractError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of extraction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Unparseable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Unparseable => "unparseable document",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scour: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an Unparseable error.
    pub fn unparseable(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Unparseable,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an Unparseable error.
    pub fn is_unparseable(&self) -> bool {
        self.code == ErrorCode::Unparseable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_op_url_and_code() {
        let err = ExtractError::unparseable("http://example.com", "Summary", None);
        let rendered = err.to_string();
        assert!(rendered.contains("Summary"));
        assert!(rendered.contains("http://example.com"));
        assert!(rendered.contains("unparseable document"));
    }

    #[test]
    fn test_display_appends_source() {
        let err = ExtractError::fetch(
            "http://example.com",
            "Fetch",
            Some(anyhow::anyhow!("connection refused")),
        );
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_code_helpers() {
        assert!(ExtractError::invalid_url("u", "op", None).is_invalid_url());
        assert!(ExtractError::fetch("u", "op", None).is_fetch());
        assert!(ExtractError::unparseable("u", "op", None).is_unparseable());
    }
}
