//! Data-element export.
//!
//! ```text
//! type codes + roots ──▶ filter ──▶ locations × periods × data elements
//!                                          │
//!                        basic_info + DataPointVisitor per triple
//!                                          │
//!                                          ▼
//!                                   <code>*.csv (Excel dialect)
//! ```

pub mod basic_info;
pub mod filter;
pub mod headers;
pub mod visitor;
pub mod writer;

pub use basic_info::basic_info;
pub use filter::{collect_data_locations, filter_data_locations, resolve_roots, resolve_types};
pub use headers::{export_data_headers, CSV_FILE_EXTENSION, FIXED_HEADERS};
pub use visitor::{render_scalar, DataPointVisitor};
pub use writer::{excel_writer, DataElementExporter, ExportSummary, WriteStats};
