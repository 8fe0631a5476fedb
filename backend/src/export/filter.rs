//! Selection of the data locations an export covers.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::{CalculationLocation, DataLocation, DataLocationType};
use crate::store::LocationService;

/// Resolve type codes, dropping unknown and repeated ones.
pub fn resolve_types<'a>(
    locations: &'a dyn LocationService,
    type_codes: &[String],
) -> Vec<&'a DataLocationType> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut types: Vec<&DataLocationType> = Vec::new();
    for code in type_codes {
        match locations.find_data_location_type_by_code(code) {
            Some(t) => {
                if seen.insert(&t.code) {
                    types.push(t);
                }
            }
            None => debug!(code = %code, "Ignoring unknown data location type"),
        }
    }
    types
}

/// Resolve root location codes, skipping unknown ones.
pub fn resolve_roots<'a>(
    locations: &'a dyn LocationService,
    location_codes: &[String],
) -> Vec<CalculationLocation<'a>> {
    location_codes
        .iter()
        .filter_map(|code| {
            let root = locations.find_calculation_location_by_code(code);
            if root.is_none() {
                warn!(code = %code, "Skipping unknown location");
            }
            root
        })
        .collect()
}

/// Data locations under `roots` whose type is in `types`.
///
/// Keeps the first occurrence of each location, in root order.
pub fn collect_data_locations<'a>(
    locations: &'a dyn LocationService,
    roots: &[CalculationLocation<'a>],
    types: &[&'a DataLocationType],
) -> Vec<&'a DataLocation> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut collected: Vec<&DataLocation> = Vec::new();
    for &root in roots {
        let found = locations.collect_data_locations(root, types);
        debug!(root = root.code(), count = found.len(), "Collected data locations");
        for data_location in found {
            if seen.insert(&data_location.code) {
                collected.push(data_location);
            }
        }
    }
    collected
}

/// Type codes + root codes to the ordered, duplicate-free data locations.
pub fn filter_data_locations<'a>(
    locations: &'a dyn LocationService,
    type_codes: &[String],
    location_codes: &[String],
) -> Vec<&'a DataLocation> {
    let types = resolve_types(locations, type_codes);
    let roots = resolve_roots(locations, location_codes);
    collect_data_locations(locations, &roots, &types)
}
