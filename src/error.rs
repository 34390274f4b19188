//! Error types for buffer operations.

use crate::primitives::Point2;
use thiserror::Error;

/// Errors that can occur while computing a buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BufferError {
    /// Noded curves produced a topology that could not be resolved.
    ///
    /// This is the only error the precision ladder retries.
    #[error("topology failure: {message}{}", location_suffix(.location))]
    Topology {
        /// Description of the inconsistency.
        message: String,
        /// Where it was detected, when known.
        location: Option<Point2<f64>>,
    },

    /// The operation was called with unusable arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal consistency check failed.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

fn location_suffix(location: &Option<Point2<f64>>) -> String {
    match location {
        Some(p) => format!(" at {p}"),
        None => String::new(),
    }
}

impl BufferError {
    /// Creates a topology error without a location.
    pub fn topology(message: impl Into<String>) -> Self {
        BufferError::Topology {
            message: message.into(),
            location: None,
        }
    }

    /// Creates a topology error detected at `location`.
    pub fn topology_at(message: impl Into<String>, location: Point2<f64>) -> Self {
        BufferError::Topology {
            message: message.into(),
            location: Some(location),
        }
    }

    /// Returns `true` if running again at a coarser precision may succeed.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, BufferError::Topology { .. })
    }
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
