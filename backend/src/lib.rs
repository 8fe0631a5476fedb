//! # Dataexport - data-element values to CSV
//!
//! Exports the values recorded for a set of data locations, periods and data
//! elements into a single CSV file, one row per exported data point.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ DataExport  │────▶│   Filter    │────▶│  Visitor    │────▶│  CSV File   │
//! │  (request)  │     │ (locations) │     │ (per value) │     │   (temp)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dataexport::{DataElementExporter, DataExport, ExportConfig, MemoryDataset};
//!
//! let dataset = MemoryDataset::from_path("dataset.json")?;
//! let exporter = DataElementExporter::new(&dataset, &dataset, ExportConfig::from_env()?);
//! let summary = exporter.export_data(&request)?;
//! println!("Wrote {}", summary.path.display());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Environment configuration
//! - [`models`] - Locations, periods, data elements, value types
//! - [`store`] - Collaborator traits and the in-memory dataset
//! - [`export`] - Filter, header, basic info, visitor and writer

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Collaborators
pub mod store;

// Export
pub mod export;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, ExportError, ExportResult, StoreError, StoreResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::ExportConfig;

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CalculationLocation,
    DataElement,
    DataElementKind,
    DataExport,
    DataLocation,
    DataLocationType,
    DataValue,
    Locale,
    Location,
    LocationLevel,
    MapElement,
    Names,
    Period,
    ValueType,
};

// =============================================================================
// Re-exports - Collaborators
// =============================================================================

pub use store::{LocationService, MemoryDataset, ValueStore};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{
    filter_data_locations,
    export_data_headers,
    DataElementExporter,
    DataPointVisitor,
    ExportSummary,
};
