//! Column schema of the export file.

use crate::models::LocationLevel;

pub const CSV_FILE_EXTENSION: &str = ".csv";

pub const DATA_LOCATION_CODE: &str = "code";
pub const DATA_LOCATION_NAME: &str = "name";
pub const LOCATION_TYPE: &str = "type";
pub const PERIOD_CODE: &str = "period_code";
pub const PERIOD: &str = "period";
pub const DATA_CLASS: &str = "data_class";
pub const DATA_CODE: &str = "data_code";
pub const DATA_NAME: &str = "data_name";
pub const DATA_VALUE: &str = "value";
pub const DATA_VALUE_ADDRESS: &str = "value_address";

/// Columns following the level columns, in order.
pub const FIXED_HEADERS: [&str; 10] = [
    DATA_LOCATION_CODE,
    DATA_LOCATION_NAME,
    LOCATION_TYPE,
    PERIOD_CODE,
    PERIOD,
    DATA_CLASS,
    DATA_CODE,
    DATA_NAME,
    DATA_VALUE,
    DATA_VALUE_ADDRESS,
];

/// One column per level code, then [`FIXED_HEADERS`].
pub fn export_data_headers(levels: &[&LocationLevel]) -> Vec<String> {
    levels
        .iter()
        .map(|level| level.code.clone())
        .chain(FIXED_HEADERS.iter().map(|h| h.to_string()))
        .collect()
}
