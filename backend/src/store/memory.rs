//! In-memory dataset - locations, periods, data elements and values
//!
//! Loads a JSON document once, checks its references and serves both
//! collaborator traits from memory.
//!
//! ```json
//! {
//!   "levels": [{"code": "country", "order": 1}],
//!   "types": [{"code": "HC", "names": {"en": "Health Center"}}],
//!   "locations": [{"code": "RW", "level": "country"}],
//!   "data_locations": [{"code": "L1", "type": "HC", "parent": "RW"}],
//!   "periods": [{"code": "P2024", "start": "2024-01-01", "end": "2024-12-31"}],
//!   "data_elements": [{"code": "DE1", "type": {"type": "number"}}],
//!   "values": [{"data_element": "DE1", "location": "L1", "period": "P2024", "value": 42}]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{LocationService, ValueStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    CalculationLocation, DataElement, DataLocation, DataLocationType, DataValue, Location,
    LocationLevel, Period,
};

/// On-disk layout of a dataset.
#[derive(Debug, Default, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    levels: Vec<LocationLevel>,
    #[serde(default)]
    types: Vec<DataLocationType>,
    #[serde(default)]
    locations: Vec<Location>,
    #[serde(default)]
    data_locations: Vec<DataLocation>,
    #[serde(default)]
    periods: Vec<Period>,
    #[serde(default)]
    data_elements: Vec<DataElement>,
    #[serde(default)]
    values: Vec<DataValue>,
}

/// (data element, location, period)
type ValueKey = (String, String, String);

/// Dataset held in memory.
#[derive(Debug)]
pub struct MemoryDataset {
    /// Sorted by level order
    levels: Vec<LocationLevel>,
    types: Vec<DataLocationType>,
    locations: Vec<Location>,
    data_locations: Vec<DataLocation>,
    periods: Vec<Period>,
    data_elements: Vec<DataElement>,
    values: HashMap<ValueKey, Value>,
    /// Type code -> index in `types`
    type_index: HashMap<String, usize>,
    /// Location code -> index in `locations`
    location_index: HashMap<String, usize>,
    /// Data location code -> index in `data_locations`
    data_location_index: HashMap<String, usize>,
    /// Period code -> index in `periods`
    period_index: HashMap<String, usize>,
    /// Data element code -> index in `data_elements`
    element_index: HashMap<String, usize>,
    /// Parent code -> child locations, declaration order
    child_locations: HashMap<String, Vec<usize>>,
    /// Parent code -> data locations, declaration order
    child_data_locations: HashMap<String, Vec<usize>>,
    lookups: Cell<usize>,
    released: Cell<usize>,
}

impl MemoryDataset {
    /// Load a dataset from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a dataset from JSON text.
    pub fn from_json_str(content: &str) -> StoreResult<Self> {
        let file: DatasetFile = serde_json::from_str(content)?;
        Self::build(file)
    }

    /// Load a dataset from an already-parsed JSON value.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let file: DatasetFile = serde_json::from_value(value)?;
        Self::build(file)
    }

    fn build(file: DatasetFile) -> StoreResult<Self> {
        let DatasetFile {
            mut levels,
            types,
            locations,
            data_locations,
            periods,
            data_elements,
            values,
        } = file;

        levels.sort_by_key(|l| l.order);

        let level_index = index_codes("level", levels.iter().map(|l| l.code.as_str()))?;
        let type_index = index_codes("type", types.iter().map(|t| t.code.as_str()))?;
        let location_index = index_codes("location", locations.iter().map(|l| l.code.as_str()))?;
        let data_location_index = index_codes(
            "data location",
            data_locations.iter().map(|d| d.code.as_str()),
        )?;
        let period_index = index_codes("period", periods.iter().map(|p| p.code.as_str()))?;
        let element_index = index_codes(
            "data element",
            data_elements.iter().map(|e| e.code.as_str()),
        )?;

        let mut child_locations: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, location) in locations.iter().enumerate() {
            check_reference("location", &location.code, "level", &location.level, &level_index)?;
            if let Some(ref parent) = location.parent {
                check_reference("location", &location.code, "parent", parent, &location_index)?;
                child_locations.entry(parent.clone()).or_default().push(i);
            }
        }

        let mut child_data_locations: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, location) in data_locations.iter().enumerate() {
            check_reference("data location", &location.code, "type", &location.type_code, &type_index)?;
            check_reference("data location", &location.code, "parent", &location.parent, &location_index)?;
            child_data_locations
                .entry(location.parent.clone())
                .or_default()
                .push(i);
        }

        check_acyclic(&locations, &location_index)?;

        let mut value_map = HashMap::with_capacity(values.len());
        for value in values {
            let key = format!("{}/{}/{}", value.data_element, value.location, value.period);
            check_reference("value", &key, "data element", &value.data_element, &element_index)?;
            check_reference("value", &key, "data location", &value.location, &data_location_index)?;
            check_reference("value", &key, "period", &value.period, &period_index)?;
            value_map.insert((value.data_element, value.location, value.period), value.value);
        }

        Ok(Self {
            levels,
            types,
            locations,
            data_locations,
            periods,
            data_elements,
            values: value_map,
            type_index,
            location_index,
            data_location_index,
            period_index,
            element_index,
            child_locations,
            child_data_locations,
            lookups: Cell::new(0),
            released: Cell::new(0),
        })
    }

    /// Number of value lookups served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }

    /// Number of values handed back through [`ValueStore::release`].
    pub fn released_count(&self) -> usize {
        self.released.get()
    }

    fn location(&self, code: &str) -> Option<&Location> {
        self.location_index.get(code).map(|&i| &self.locations[i])
    }

    fn collect_under<'s>(
        &'s self,
        code: &str,
        types: &[&DataLocationType],
        out: &mut Vec<&'s DataLocation>,
    ) {
        if let Some(indices) = self.child_data_locations.get(code) {
            for &i in indices {
                let data_location = &self.data_locations[i];
                if has_type(data_location, types) {
                    out.push(data_location);
                }
            }
        }
        if let Some(children) = self.child_locations.get(code) {
            for &i in children {
                self.collect_under(&self.locations[i].code, types, out);
            }
        }
    }
}

impl LocationService for MemoryDataset {
    fn find_data_location_type_by_code(&self, code: &str) -> Option<&DataLocationType> {
        self.type_index.get(code).map(|&i| &self.types[i])
    }

    fn find_calculation_location_by_code(&self, code: &str) -> Option<CalculationLocation<'_>> {
        if let Some(location) = self.location(code) {
            return Some(CalculationLocation::Location(location));
        }
        self.data_location_index
            .get(code)
            .map(|&i| CalculationLocation::DataLocation(&self.data_locations[i]))
    }

    fn list_levels(&self) -> Vec<&LocationLevel> {
        self.levels.iter().collect()
    }

    fn collect_data_locations(
        &self,
        root: CalculationLocation<'_>,
        types: &[&DataLocationType],
    ) -> Vec<&DataLocation> {
        let mut out = Vec::new();
        match root {
            CalculationLocation::DataLocation(d) => {
                if let Some(&i) = self.data_location_index.get(&d.code) {
                    let data_location = &self.data_locations[i];
                    if has_type(data_location, types) {
                        out.push(data_location);
                    }
                }
            }
            CalculationLocation::Location(l) => self.collect_under(&l.code, types, &mut out),
        }
        out
    }

    fn parent_of_level(&self, location: &DataLocation, level: &LocationLevel) -> Option<&Location> {
        let mut current = self.location(&location.parent);
        while let Some(candidate) = current {
            if candidate.level == level.code {
                return Some(candidate);
            }
            current = candidate.parent.as_deref().and_then(|p| self.location(p));
        }
        None
    }

    fn data_location_type(&self, location: &DataLocation) -> Option<&DataLocationType> {
        self.find_data_location_type_by_code(&location.type_code)
    }
}

impl ValueStore for MemoryDataset {
    fn find_period_by_code(&self, code: &str) -> Option<&Period> {
        self.period_index.get(code).map(|&i| &self.periods[i])
    }

    fn find_data_element_by_code(&self, code: &str) -> Option<&DataElement> {
        self.element_index.get(code).map(|&i| &self.data_elements[i])
    }

    fn data_element_value(
        &self,
        data_element: &DataElement,
        location: &DataLocation,
        period: &Period,
    ) -> StoreResult<Option<DataValue>> {
        self.lookups.set(self.lookups.get() + 1);

        let key = (
            data_element.code.clone(),
            location.code.clone(),
            period.code.clone(),
        );
        Ok(self.values.get(&key).map(|value| DataValue {
            data_element: key.0.clone(),
            location: key.1.clone(),
            period: key.2.clone(),
            value: value.clone(),
        }))
    }

    fn release(&self, value: DataValue) {
        self.released.set(self.released.get() + 1);
        drop(value);
    }
}

fn has_type(location: &DataLocation, types: &[&DataLocationType]) -> bool {
    types.iter().any(|t| t.code == location.type_code)
}

/// Map codes to their position, rejecting duplicates.
fn index_codes<'a>(
    kind: &'static str,
    codes: impl Iterator<Item = &'a str>,
) -> StoreResult<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, code) in codes.enumerate() {
        if index.insert(code.to_string(), i).is_some() {
            return Err(StoreError::DuplicateCode {
                kind,
                code: code.to_string(),
            });
        }
    }
    Ok(index)
}

fn check_reference(
    kind: &'static str,
    code: &str,
    target: &'static str,
    reference: &str,
    index: &HashMap<String, usize>,
) -> StoreResult<()> {
    if index.contains_key(reference) {
        Ok(())
    } else {
        Err(StoreError::DanglingReference {
            kind,
            code: code.to_string(),
            target,
            reference: reference.to_string(),
        })
    }
}

/// Every parent chain must reach a root within `locations.len()` steps.
fn check_acyclic(locations: &[Location], index: &HashMap<String, usize>) -> StoreResult<()> {
    for location in locations {
        let mut current = location.parent.as_deref();
        let mut steps = 0;
        while let Some(code) = current {
            steps += 1;
            if steps > locations.len() {
                return Err(StoreError::CyclicHierarchy(location.code.clone()));
            }
            current = index.get(code).and_then(|&i| locations[i].parent.as_deref());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValueType;
    use serde_json::json;

    fn dataset() -> MemoryDataset {
        MemoryDataset::from_value(json!({
            "levels": [
                {"code": "district", "order": 2},
                {"code": "province", "order": 1}
            ],
            "types": [
                {"code": "HC", "names": {"en": "Health Center"}},
                {"code": "DH", "names": {"en": "District Hospital"}}
            ],
            "locations": [
                {"code": "North", "level": "province"},
                {"code": "Burera", "level": "district", "parent": "North"},
                {"code": "Gakenke", "level": "district", "parent": "North"}
            ],
            "data_locations": [
                {"code": "butaro", "type": "DH", "parent": "Burera"},
                {"code": "kivuye", "type": "HC", "parent": "Burera"},
                {"code": "nemba", "type": "HC", "parent": "Gakenke"}
            ],
            "periods": [{"code": "P2024", "start": "2024-01-01", "end": "2024-12-31"}],
            "data_elements": [{"code": "DE1", "type": {"type": "number"}}],
            "values": [{"data_element": "DE1", "location": "kivuye", "period": "P2024", "value": 42}]
        }))
        .unwrap()
    }

    fn codes(locations: &[&DataLocation]) -> Vec<String> {
        locations.iter().map(|l| l.code.clone()).collect()
    }

    #[test]
    fn test_levels_sorted_by_order() {
        let ds = dataset();
        let levels: Vec<_> = ds.list_levels().iter().map(|l| l.code.clone()).collect();
        assert_eq!(levels, vec!["province", "district"]);
    }

    #[test]
    fn test_collect_depth_first_in_declaration_order() {
        let ds = dataset();
        let hc = ds.find_data_location_type_by_code("HC").unwrap();
        let dh = ds.find_data_location_type_by_code("DH").unwrap();
        let root = ds.find_calculation_location_by_code("North").unwrap();

        assert_eq!(codes(&ds.collect_data_locations(root, &[hc])), vec!["kivuye", "nemba"]);
        assert_eq!(
            codes(&ds.collect_data_locations(root, &[hc, dh])),
            vec!["butaro", "kivuye", "nemba"]
        );
        assert!(ds.collect_data_locations(root, &[]).is_empty());
    }

    #[test]
    fn test_data_location_root_yields_itself() {
        let ds = dataset();
        let hc = ds.find_data_location_type_by_code("HC").unwrap();
        let dh = ds.find_data_location_type_by_code("DH").unwrap();
        let root = ds.find_calculation_location_by_code("kivuye").unwrap();

        assert_eq!(codes(&ds.collect_data_locations(root, &[hc])), vec!["kivuye"]);
        assert!(ds.collect_data_locations(root, &[dh]).is_empty());
    }

    #[test]
    fn test_parent_of_level() {
        let ds = dataset();
        let levels = ds.list_levels();
        let Some(CalculationLocation::DataLocation(nemba)) =
            ds.find_calculation_location_by_code("nemba")
        else {
            panic!("nemba should be a data location");
        };

        assert_eq!(ds.parent_of_level(nemba, levels[0]).unwrap().code, "North");
        assert_eq!(ds.parent_of_level(nemba, levels[1]).unwrap().code, "Gakenke");
    }

    #[test]
    fn test_value_lookup_and_release() {
        let ds = dataset();
        let element = ds.find_data_element_by_code("DE1").unwrap();
        let period = ds.find_period_by_code("P2024").unwrap();
        let Some(CalculationLocation::DataLocation(kivuye)) =
            ds.find_calculation_location_by_code("kivuye")
        else {
            panic!("kivuye should be a data location");
        };
        let Some(CalculationLocation::DataLocation(nemba)) =
            ds.find_calculation_location_by_code("nemba")
        else {
            panic!("nemba should be a data location");
        };

        let value = ds.data_element_value(element, kivuye, period).unwrap().unwrap();
        assert_eq!(value.value, json!(42));
        assert!(ds.data_element_value(element, nemba, period).unwrap().is_none());

        ds.release(value);
        assert_eq!(ds.lookup_count(), 2);
        assert_eq!(ds.released_count(), 1);
    }

    #[test]
    fn test_code_lookups() {
        let ds = MemoryDataset::from_value(json!({
            "types": [{"code": "HC"}, {"code": "DH"}, {"code": "PH"}],
            "periods": [
                {"code": "P1", "start": "2024-01-01", "end": "2024-06-30"},
                {"code": "P2", "start": "2024-07-01", "end": "2024-12-31"}
            ],
            "data_elements": [
                {"code": "DE1", "type": {"type": "number"}},
                {"code": "DE2", "type": {"type": "text"}}
            ]
        }))
        .unwrap();

        assert_eq!(ds.find_data_location_type_by_code("PH").unwrap().code, "PH");
        assert_eq!(ds.find_period_by_code("P2").unwrap().start.to_string(), "2024-07-01");
        assert_eq!(ds.find_data_element_by_code("DE2").unwrap().value_type, ValueType::Text);
        assert!(ds.find_period_by_code("P3").is_none());
        assert!(ds.find_data_element_by_code("de1").is_none());
    }

    #[test]
    fn test_dangling_type_rejected() {
        let err = MemoryDataset::from_value(json!({
            "levels": [{"code": "country", "order": 1}],
            "locations": [{"code": "RW", "level": "country"}],
            "data_locations": [{"code": "L1", "type": "HC", "parent": "RW"}]
        }))
        .unwrap_err();

        assert!(matches!(err, StoreError::DanglingReference { target: "type", .. }));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let err = MemoryDataset::from_value(json!({
            "periods": [
                {"code": "P1", "start": "2024-01-01", "end": "2024-06-30"},
                {"code": "P1", "start": "2024-07-01", "end": "2024-12-31"}
            ]
        }))
        .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateCode { kind: "period", .. }));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = MemoryDataset::from_value(json!({
            "levels": [{"code": "district", "order": 1}],
            "locations": [
                {"code": "A", "level": "district", "parent": "B"},
                {"code": "B", "level": "district", "parent": "A"}
            ]
        }))
        .unwrap_err();

        assert!(matches!(err, StoreError::CyclicHierarchy(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        fs::write(&path, r#"{"types": [{"code": "HC"}]}"#).unwrap();

        let ds = MemoryDataset::from_path(&path).unwrap();
        assert!(ds.find_data_location_type_by_code("HC").is_some());
        assert!(ds.find_data_location_type_by_code("XX").is_none());
    }
}
