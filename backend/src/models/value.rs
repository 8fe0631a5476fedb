//! Value type catalog and stored values.
//!
//! A data element declares a [`ValueType`]; the stored [`DataValue`] is a JSON
//! document whose shape follows that type:
//!
//! ```text
//! number  -> 42            list -> [1, 2, 3]
//! bool    -> true          map  -> {"male": 10, "female": 12}
//! string  -> "yes"
//! text    -> "long text"
//! date    -> "2024-03-01"
//! enum    -> "option_code"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a data element's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueType {
    Number,
    Bool,
    String,
    Text,
    Date,
    /// Option code of an enumeration.
    Enum,
    /// Homogeneous list.
    List { list_type: Box<ValueType> },
    /// Fixed set of named sub-values, kept in declaration order.
    Map { elements: Vec<MapElement> },
}

impl ValueType {
    pub fn list_of(list_type: ValueType) -> Self {
        Self::List {
            list_type: Box::new(list_type),
        }
    }

    pub fn map_of(elements: impl IntoIterator<Item = (&'static str, ValueType)>) -> Self {
        Self::Map {
            elements: elements
                .into_iter()
                .map(|(key, value_type)| MapElement {
                    key: key.to_string(),
                    value_type,
                })
                .collect(),
        }
    }
}

/// Named entry of a [`ValueType::Map`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapElement {
    pub key: String,
    pub value_type: ValueType,
}

/// Stored value of one (data element, location, period) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub data_element: String,
    pub location: String,
    pub period: String,
    pub value: Value,
}

impl DataValue {
    /// A JSON `null` value carries nothing to export.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }
}
