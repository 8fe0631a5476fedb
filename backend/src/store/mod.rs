//! Collaborators the export reads from.
//!
//! The export never touches persistence directly. It goes through two traits:
//!
//! - [`LocationService`] - types, levels and the location hierarchy
//! - [`ValueStore`] - periods, data elements and stored values
//!
//! [`MemoryDataset`] implements both from a JSON document.

pub mod memory;

use crate::error::StoreResult;
use crate::models::{
    CalculationLocation, DataElement, DataLocation, DataLocationType, DataValue, Location,
    LocationLevel, Period,
};

pub use memory::MemoryDataset;

/// Access to the location hierarchy.
pub trait LocationService {
    /// Type with the given code, `None` when unknown.
    fn find_data_location_type_by_code(&self, code: &str) -> Option<&DataLocationType>;

    /// Location or data location with the given code.
    fn find_calculation_location_by_code(&self, code: &str) -> Option<CalculationLocation<'_>>;

    /// All levels, in hierarchy order.
    fn list_levels(&self) -> Vec<&LocationLevel>;

    /// Data locations under `root` (or `root` itself) whose type is in `types`.
    fn collect_data_locations(
        &self,
        root: CalculationLocation<'_>,
        types: &[&DataLocationType],
    ) -> Vec<&DataLocation>;

    /// Ancestor of `location` sitting on `level`.
    fn parent_of_level(&self, location: &DataLocation, level: &LocationLevel) -> Option<&Location>;

    /// Type of `location`, `None` if it cannot be resolved.
    fn data_location_type(&self, location: &DataLocation) -> Option<&DataLocationType>;
}

/// Access to periods, data elements and their values.
pub trait ValueStore {
    fn find_period_by_code(&self, code: &str) -> Option<&Period>;

    fn find_data_element_by_code(&self, code: &str) -> Option<&DataElement>;

    /// Stored value of the triple, `None` when nothing was recorded.
    fn data_element_value(
        &self,
        data_element: &DataElement,
        location: &DataLocation,
        period: &Period,
    ) -> StoreResult<Option<DataValue>>;

    /// Hands a looked-up value back once it has been exported.
    fn release(&self, value: DataValue) {
        drop(value);
    }
}
