//! Descriptive columns shared by every row of one (location, period, data element).

use crate::models::{DataElement, DataLocation, Locale, Period};
use crate::store::LocationService;

/// Everything but the value and address columns, aligned with the header.
///
/// Missing ancestors, types and translations give empty strings.
pub fn basic_info(
    locations: &dyn LocationService,
    locale: &Locale,
    location: &DataLocation,
    period: &Period,
    data_element: &DataElement,
) -> Vec<String> {
    let levels = locations.list_levels();
    let mut info = Vec::with_capacity(levels.len() + 8);

    for level in levels {
        let parent = locations.parent_of_level(location, level);
        info.push(parent.map(|p| p.names.resolve(locale)).unwrap_or_default());
    }

    info.push(location.code.clone());
    info.push(location.names.resolve(locale));
    info.push(
        locations
            .data_location_type(location)
            .map(|t| t.names.resolve(locale))
            .unwrap_or_default(),
    );
    info.push(period.code.clone());
    info.push(period.display_range());
    info.push(data_element.kind.class_name().to_string());
    info.push(data_element.code.clone());
    info.push(data_element.names.resolve(locale));
    info
}
