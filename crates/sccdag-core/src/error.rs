//! Error taxonomy for the analysis core.
//!
//! Only caller mistakes are errors. A cycle where an acyclic graph is
//! required is reported by value (`false`, an empty order, `None`) so callers
//! can branch on feasibility without matching on errors.

use std::fmt;

/// Result alias used throughout the analysis core.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Failures raised by graph construction and analysis queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An argument was rejected before any work was done (for example a
    /// non-positive vertex count).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A vertex index fell outside `[0, vertex_count)`.
    #[error("vertex {vertex} is out of range [0, {vertex_count})")]
    OutOfRange {
        /// Offending index.
        vertex: usize,
        /// Vertex count of the graph the index was checked against.
        vertex_count: usize,
    },

    /// A query was issued before the computation it depends on ran.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::OutOfRange { .. } => ErrorCode::OutOfRange,
            Self::IllegalState(_) => ErrorCode::IllegalState,
        }
    }
}

/// Stable error codes for JSON output and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    OutOfRange,
    IllegalState,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "E1001",
            Self::OutOfRange => "E1002",
            Self::IllegalState => "E2001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument => Some("Graphs need at least one vertex."),
            Self::OutOfRange => Some("Edge endpoints must lie in [0, vertices)."),
            Self::IllegalState => Some("Run the compute step before querying its results."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let all = [
            ErrorCode::InvalidArgument,
            ErrorCode::OutOfRange,
            ErrorCode::IllegalState,
        ];
        let codes: HashSet<&str> = all.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn out_of_range_message_names_bounds() {
        let err = GraphError::OutOfRange {
            vertex: 7,
            vertex_count: 3,
        };
        assert_eq!(err.to_string(), "vertex 7 is out of range [0, 3)");
        assert_eq!(err.code().code(), "E1002");
    }
}
