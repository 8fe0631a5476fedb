//! Error types for the data-element export.
//!
//! This module defines a small hierarchy of error types:
//!
//! - [`StoreError`] - Dataset loading and collaborator errors
//! - [`ConfigError`] - Invalid environment configuration
//! - [`ExportError`] - Top-level export errors (file creation, writing, closing)
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! A missing value, an unknown code or a missing display name is never an
//! error: those are handled where they are met.

use thiserror::Error;

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by the location/value collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the dataset file.
    #[error("Failed to read dataset: {0}")]
    IoError(#[from] std::io::Error),

    /// Dataset is not valid JSON or does not match the expected layout.
    #[error("Invalid dataset JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A record points at a code that is not declared.
    #[error("{kind} '{code}' references unknown {target} '{reference}'")]
    DanglingReference {
        kind: &'static str,
        code: String,
        target: &'static str,
        reference: String,
    },

    /// Two records of the same kind share a code.
    #[error("Duplicate {kind} code: {code}")]
    DuplicateCode { kind: &'static str, code: String },

    /// Following parents from a location leads back to it.
    #[error("Location hierarchy has a cycle through '{0}'")]
    CyclicHierarchy(String),

    /// Backend failure while looking something up.
    #[error("Lookup failed: {0}")]
    Lookup(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading the export configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but empty or unusable.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

// =============================================================================
// Export Errors (top-level)
// =============================================================================

/// Top-level export errors.
///
/// This is the error type returned by [`crate::export::DataElementExporter`].
/// Any variant aborts the current export; the partially written file is left
/// on disk for the caller.
#[derive(Debug, Error)]
pub enum ExportError {
    /// File creation, write or close failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Collaborator failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for collaborator operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // StoreError -> ExportError
        let store_err = StoreError::Lookup("connection reset".into());
        let export_err: ExportError = store_err.into();
        assert!(export_err.to_string().contains("connection reset"));

        // io::Error -> ExportError
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let export_err: ExportError = io_err.into();
        assert!(export_err.to_string().contains("disk full"));
    }

    #[test]
    fn test_dangling_reference_format() {
        let err = StoreError::DanglingReference {
            kind: "data location",
            code: "L1".into(),
            target: "type",
            reference: "HC".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'L1'"));
        assert!(msg.contains("unknown type 'HC'"));
    }
}
