//! Domain models for the data-element export.
//!
//! This module contains the data structures the export works on:
//!
//! - [`Names`] - Translated display names, always resolvable to a string
//! - [`LocationLevel`], [`DataLocationType`] - Hierarchy metadata
//! - [`Location`], [`DataLocation`], [`CalculationLocation`] - Hierarchy nodes
//! - [`Period`] - Reporting date range
//! - [`DataElement`] - Typed quantity, see [`value`] for the type catalog
//! - [`DataExport`] - One export request

pub mod value;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use value::{DataValue, MapElement, ValueType};

// =============================================================================
// Translated Names
// =============================================================================

/// Language selection used when resolving [`Names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Preferred language code.
    pub language: String,
    /// Used when the preferred language has no translation.
    pub fallback: String,
}

impl Locale {
    pub fn new(language: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            fallback: fallback.into(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "en")
    }
}

/// Display names keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Names(BTreeMap<String, String>);

impl Names {
    /// Names with a single translation.
    pub fn single(language: &str, text: &str) -> Self {
        let mut names = BTreeMap::new();
        names.insert(language.to_string(), text.to_string());
        Self(names)
    }

    /// Text for the locale's language, else its fallback, else `""`.
    pub fn resolve(&self, locale: &Locale) -> String {
        self.0
            .get(&locale.language)
            .or_else(|| self.0.get(&locale.fallback))
            .cloned()
            .unwrap_or_default()
    }
}

// =============================================================================
// Location Hierarchy
// =============================================================================

/// A rung of the location hierarchy (country, province, district...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationLevel {
    pub code: String,
    #[serde(default)]
    pub names: Names,
    /// Position in the hierarchy, lowest first.
    pub order: u32,
}

/// Kind of facility a data location is (health center, hospital...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLocationType {
    pub code: String,
    #[serde(default)]
    pub names: Names,
}

/// Non-leaf node of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    #[serde(default)]
    pub names: Names,
    /// Code of the [`LocationLevel`] this location sits on.
    pub level: String,
    /// Code of the parent location, `None` for the root.
    #[serde(default)]
    pub parent: Option<String>,
}

/// Leaf node of the hierarchy, where values are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLocation {
    pub code: String,
    #[serde(default)]
    pub names: Names,
    /// Code of the [`DataLocationType`].
    #[serde(rename = "type")]
    pub type_code: String,
    /// Code of the enclosing [`Location`].
    pub parent: String,
}

/// A location used as an export root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalculationLocation<'a> {
    Location(&'a Location),
    DataLocation(&'a DataLocation),
}

impl CalculationLocation<'_> {
    pub fn code(&self) -> &str {
        match self {
            Self::Location(l) => &l.code,
            Self::DataLocation(d) => &d.code,
        }
    }
}

// =============================================================================
// Periods
// =============================================================================

/// Reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub code: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// `[ 2024-01-01 - 2024-12-31 ]`
    pub fn display_range(&self) -> String {
        format!("[ {} - {} ]", self.start, self.end)
    }
}

// =============================================================================
// Data Elements
// =============================================================================

/// Implementation class of a data element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataElementKind {
    /// Value entered directly.
    #[default]
    #[serde(rename = "raw")]
    Raw,
    /// Value derived from a per-location-type expression.
    #[serde(rename = "normalized")]
    Normalized,
}

impl DataElementKind {
    /// Class name written in the data-class column.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Raw => "RawDataElement",
            Self::Normalized => "NormalizedDataElement",
        }
    }
}

/// Named, typed quantity collected per location and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElement {
    pub code: String,
    #[serde(default)]
    pub names: Names,
    #[serde(default)]
    pub kind: DataElementKind,
    /// Declared type; decides how a value becomes rows.
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

// =============================================================================
// Export Request
// =============================================================================

/// One data-element export request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataExport {
    /// Used to name the output file.
    pub code: String,
    #[serde(default)]
    pub descriptions: Names,
    /// Data location type codes to keep.
    #[serde(default)]
    pub type_codes: Vec<String>,
    /// Root locations to collect data locations from.
    #[serde(default)]
    pub location_codes: Vec<String>,
    #[serde(default)]
    pub period_codes: Vec<String>,
    #[serde(default)]
    pub data_element_codes: Vec<String>,
}
