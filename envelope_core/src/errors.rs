//! # Error Types
//!
//! Structured error types for envelope_core. Every variant carries enough
//! context for a front end to point at the offending field and for tooling to
//! react programmatically through [`EnvelopeError::error_code`].
//!
//! Errors fall into the classes of [`ErrorKind`]: local validation failures,
//! rejected persistence requests, project file storage problems, and internal
//! faults. None of them is fatal; each is recovered by the operation that
//! raised it.
//!
//! ## Example
//!
//! ```rust
//! use envelope_core::errors::{EnvelopeError, EnvelopeResult, ErrorKind};
//!
//! fn require_thickness(thickness: f64) -> EnvelopeResult<()> {
//!     if thickness <= 0.0 {
//!         return Err(EnvelopeError::invalid_input(
//!             "thickness",
//!             thickness.to_string(),
//!             "Thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = require_thickness(0.0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for envelope_core operations
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Broad error classes, used by front ends to decide how to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Local, synchronous input problems. Nothing was mutated.
    Validation,
    /// The element persistence collaborator refused or failed the update.
    Persistence,
    /// Project file I/O, locking, or format problems.
    Storage,
    /// Should not happen.
    Internal,
}

/// Structured error type for configuration, editing and persistence.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EnvelopeError {
    /// An input value is invalid (out of range, unparsable, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A value is not among the options the decision table allows
    #[error("'{value}' is not allowed for '{field}' (allowed: {allowed})")]
    InvalidSelection {
        field: String,
        value: String,
        allowed: String,
    },

    /// Substance/maker/product does not match any catalog entry
    #[error("No catalog entry for {substance} / {maker} / {product}")]
    CatalogEntryNotFound {
        substance: String,
        maker: String,
        product: String,
    },

    /// Thickness outside the catalog range of the resolved entry
    #[error("Thickness {thickness} is outside the allowed range [{min}, {max}]")]
    ThicknessOutOfRange { thickness: f64, min: f64, max: f64 },

    /// A catalog failed validation while loading
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// A layer operation was requested while no layer dialog is open
    #[error("No layer is being edited")]
    NotEditing,

    /// An index does not address an existing layer
    #[error("Index {index} is out of range for {len} layers")]
    IndexOutOfRange { index: usize, len: usize },

    /// The addressed element does not exist
    #[error("Element not found: {element_id}")]
    ElementNotFound { element_id: String },

    /// The persistence collaborator rejected or failed the update
    #[error("Update failed: {message}")]
    PersistenceFailed { message: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EnvelopeError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EnvelopeError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EnvelopeError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidSelection error listing the allowed options
    pub fn invalid_selection<T: std::fmt::Display>(
        field: impl Into<String>,
        value: impl std::fmt::Display,
        allowed: &[T],
    ) -> Self {
        let allowed = if allowed.is_empty() {
            "none".to_string()
        } else {
            allowed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        EnvelopeError::InvalidSelection {
            field: field.into(),
            value: value.to_string(),
            allowed,
        }
    }

    /// Create a CatalogEntryNotFound error
    pub fn catalog_entry_not_found(
        substance: impl Into<String>,
        maker: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        EnvelopeError::CatalogEntryNotFound {
            substance: substance.into(),
            maker: maker.into(),
            product: product.into(),
        }
    }

    /// Create an InvalidCatalog error
    pub fn invalid_catalog(reason: impl Into<String>) -> Self {
        EnvelopeError::InvalidCatalog {
            reason: reason.into(),
        }
    }

    /// Create a PersistenceFailed error
    pub fn persistence_failed(message: impl Into<String>) -> Self {
        EnvelopeError::PersistenceFailed {
            message: message.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EnvelopeError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EnvelopeError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        EnvelopeError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Which recovery class this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvelopeError::InvalidInput { .. }
            | EnvelopeError::MissingField { .. }
            | EnvelopeError::InvalidSelection { .. }
            | EnvelopeError::CatalogEntryNotFound { .. }
            | EnvelopeError::ThicknessOutOfRange { .. }
            | EnvelopeError::InvalidCatalog { .. }
            | EnvelopeError::NotEditing
            | EnvelopeError::IndexOutOfRange { .. } => ErrorKind::Validation,
            EnvelopeError::ElementNotFound { .. } | EnvelopeError::PersistenceFailed { .. } => {
                ErrorKind::Persistence
            }
            EnvelopeError::FileError { .. }
            | EnvelopeError::FileLocked { .. }
            | EnvelopeError::SerializationError { .. }
            | EnvelopeError::VersionMismatch { .. } => ErrorKind::Storage,
            EnvelopeError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EnvelopeError::FileLocked { .. } | EnvelopeError::PersistenceFailed { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EnvelopeError::InvalidInput { .. } => "INVALID_INPUT",
            EnvelopeError::MissingField { .. } => "MISSING_FIELD",
            EnvelopeError::InvalidSelection { .. } => "INVALID_SELECTION",
            EnvelopeError::CatalogEntryNotFound { .. } => "CATALOG_ENTRY_NOT_FOUND",
            EnvelopeError::ThicknessOutOfRange { .. } => "THICKNESS_OUT_OF_RANGE",
            EnvelopeError::InvalidCatalog { .. } => "INVALID_CATALOG",
            EnvelopeError::NotEditing => "NOT_EDITING",
            EnvelopeError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            EnvelopeError::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            EnvelopeError::PersistenceFailed { .. } => "PERSISTENCE_FAILED",
            EnvelopeError::FileError { .. } => "FILE_ERROR",
            EnvelopeError::FileLocked { .. } => "FILE_LOCKED",
            EnvelopeError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EnvelopeError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EnvelopeError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
