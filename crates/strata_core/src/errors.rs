//! Error Types
//!
//! This module defines the error types used throughout Strata.
//!
//! # Overview
//!
//! The main error type [`StrataError`] covers every failure mode of the
//! archive cache:
//! - Archive open failures (missing, unreadable or malformed files)
//! - Hierarchy path resolution failures and root-relative queries outside their root
//! - Underlying I/O and JSON decoding errors
//!
//! Capacity eviction is not an error: it is only observable as a later cache
//! miss for a previously resident archive.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, StrataError>`.
//!
//! ```rust,ignore
//! use strata_core::errors::{Result, StrataError};
//!
//! fn open_scene() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Strata.
#[derive(Error, Debug)]
pub enum StrataError {
    // ========================================================================
    // Archive Errors
    // ========================================================================
    /// The archive could not be opened. It is never inserted into the cache.
    #[error("Failed to open archive '{}': {reason}", path.display())]
    OpenFailure {
        /// Path of the archive on disk
        path: PathBuf,
        /// Human readable cause
        reason: String,
    },

    /// The archive document is structurally invalid.
    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A hierarchy path segment does not exist under the node reached so far.
    #[error("Hierarchy path '{path}' not found: no child named '{segment}'")]
    PathNotFound {
        /// The full requested hierarchy path
        path: String,
        /// The first segment that could not be resolved
        segment: String,
    },

    /// An object path used in root-relative space does not lie under the root path.
    #[error("Hierarchy path '{path}' is not under root '{root}'")]
    OutsideRoot {
        /// The object path
        path: String,
        /// The root path it was expected under
        root: String,
    },

    // ========================================================================
    // I/O & Parsing Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StrataError {
    /// Wraps any error raised while opening `path` into an [`OpenFailure`](Self::OpenFailure).
    pub fn open_failure(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Self::OpenFailure {
            path: path.into(),
            reason: cause.to_string(),
        }
    }

    /// Returns `true` for hierarchy resolution failures.
    #[inline]
    #[must_use]
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    /// Returns `true` for archive open failures.
    #[inline]
    #[must_use]
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::OpenFailure { .. })
    }
}

/// Alias for `Result<T, StrataError>`.
pub type Result<T> = std::result::Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failure_message_names_the_file() {
        let err = StrataError::open_failure("/tmp/shot.mdc", "No such file");
        assert!(err.is_open_failure());
        assert_eq!(
            err.to_string(),
            "Failed to open archive '/tmp/shot.mdc': No such file"
        );
    }

    #[test]
    fn path_not_found_names_the_segment() {
        let err = StrataError::PathNotFound {
            path: "/a/missing".to_string(),
            segment: "missing".to_string(),
        };
        assert!(err.is_path_not_found());
        assert!(err.to_string().contains("'missing'"));
    }
}
