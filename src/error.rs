//! Error types for snapshot queries.
//!
//! Two layers:
//!
//! - [`SourceError`] is what a [`RawSource`](crate::source::RawSource)
//!   reports when it cannot produce a value.
//! - [`SnapshotError`] is what every public query returns. Raw source
//!   failures are wrapped into [`SnapshotError::SourceUnavailable`] together
//!   with the name of the query that failed.

use thiserror::Error;

/// Errors reported by a raw source adapter.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The platform or the adapter has no way to obtain this datum
    #[error("not supported on this platform")]
    Unsupported,

    /// The datum exists but the current user may not read it
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// I/O error while reading a platform file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A platform file or API returned something the adapter could not parse
    #[error("parse error: {0}")]
    Parse(String),
}

impl SourceError {
    /// Build a parse error from anything printable.
    pub fn parse(msg: impl Into<String>) -> Self {
        SourceError::Parse(msg.into())
    }
}

/// Errors returned by snapshot queries.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// A raw value has no public representation. Always a defect.
    #[error("cannot map {field}: unsupported raw value '{value}'")]
    Mapping { field: &'static str, value: String },

    /// The raw source could not produce the value for this query
    #[error("{query} is unavailable: {reason}")]
    SourceUnavailable {
        query: &'static str,
        #[source]
        reason: SourceError,
    },

    /// The requested identifier does not currently exist
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: u32 },
}

impl SnapshotError {
    pub fn mapping(field: &'static str, value: impl ToString) -> Self {
        SnapshotError::Mapping {
            field,
            value: value.to_string(),
        }
    }

    pub fn unavailable(query: &'static str, reason: SourceError) -> Self {
        SnapshotError::SourceUnavailable { query, reason }
    }

    /// True for [`SnapshotError::SourceUnavailable`].
    ///
    /// Callers that render partial snapshots use this to decide whether a
    /// field should be shown as "not available" instead of failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SnapshotError::SourceUnavailable { .. })
    }
}

/// Result alias used by every public query.
pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;

/// Attach the query name to a raw source result.
pub(crate) trait QueryContext<T> {
    fn query(self, name: &'static str) -> Result<T>;
}

impl<T> QueryContext<T> for std::result::Result<T, SourceError> {
    fn query(self, name: &'static str) -> Result<T> {
        self.map_err(|reason| SnapshotError::unavailable(name, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_error_names_field_and_value() {
        let err = SnapshotError::mapping("OSProcess.state", "FLYING");
        let message = err.to_string();
        assert!(message.contains("OSProcess.state"));
        assert!(message.contains("FLYING"));
    }

    #[test]
    fn test_query_context_wraps_source_error() {
        let raw: std::result::Result<u32, SourceError> = Err(SourceError::Unsupported);
        let err = raw.query("services").unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.to_string(), "services is unavailable: not supported on this platform");
    }

    #[test]
    fn test_not_found_display() {
        let err = SnapshotError::NotFound { what: "process", id: 42 };
        assert_eq!(err.to_string(), "process 42 not found");
        assert!(!err.is_unavailable());
    }
}
