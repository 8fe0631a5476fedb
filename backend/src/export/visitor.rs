//! Flattening of a stored value into export rows.
//!
//! Each scalar leaf of a value becomes one row: the shared basic-info prefix,
//! the rendered leaf, and the leaf's address inside the value.
//!
//! ```text
//! type: map { beds: number, staff: list<number> }
//! value: {"beds": 12, "staff": [3, 4]}
//!
//! prefix.. | 12 | beds
//! prefix.. | 3  | staff[0]
//! prefix.. | 4  | staff[1]
//! ```
//!
//! `null` at any position yields no row.

use serde_json::Value;

use crate::models::ValueType;

/// Collects the rows produced for one value.
#[derive(Debug, Default)]
pub struct DataPointVisitor {
    basic_info: Vec<String>,
    lines: Vec<Vec<String>>,
}

impl DataPointVisitor {
    pub fn new(basic_info: Vec<String>) -> Self {
        Self {
            basic_info,
            lines: Vec::new(),
        }
    }

    pub fn set_basic_info(&mut self, basic_info: Vec<String>) {
        self.basic_info = basic_info;
    }

    /// Walk `value` as an instance of `value_type`, starting at the root address.
    pub fn visit(&mut self, value_type: &ValueType, value: &Value) {
        self.handle(value_type, value, "");
    }

    pub fn into_lines(self) -> Vec<Vec<String>> {
        self.lines
    }

    fn handle(&mut self, value_type: &ValueType, value: &Value, address: &str) {
        if value.is_null() {
            return;
        }

        match value_type {
            ValueType::List { list_type } => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        self.handle(list_type, item, &format!("{}[{}]", address, i));
                    }
                }
                None => self.add_line(value.to_string(), address),
            },
            ValueType::Map { elements } => match value.as_object() {
                Some(entries) => {
                    for element in elements {
                        if let Some(entry) = entries.get(&element.key) {
                            let child = map_address(address, &element.key);
                            self.handle(&element.value_type, entry, &child);
                        }
                    }
                }
                None => self.add_line(value.to_string(), address),
            },
            scalar => self.add_line(render_scalar(scalar, value), address),
        }
    }

    fn add_line(&mut self, rendered: String, address: &str) {
        let mut line = Vec::with_capacity(self.basic_info.len() + 2);
        line.extend(self.basic_info.iter().cloned());
        line.push(rendered);
        line.push(address.to_string());
        self.lines.push(line);
    }
}

fn map_address(address: &str, key: &str) -> String {
    if address.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", address, key)
    }
}

/// Text written in the value column for a non-null scalar.
///
/// A value whose shape does not match its type is written as compact JSON.
pub fn render_scalar(value_type: &ValueType, value: &Value) -> String {
    match (value_type, value) {
        (ValueType::Number, Value::Number(n)) => n.to_string(),
        (ValueType::Bool, Value::Bool(b)) => b.to_string(),
        (ValueType::String, Value::String(s))
        | (ValueType::Text, Value::String(s))
        | (ValueType::Date, Value::String(s))
        | (ValueType::Enum, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prefix() -> Vec<String> {
        vec!["kivuye".to_string(), "P2024".to_string()]
    }

    fn visit(value_type: ValueType, value: Value) -> Vec<Vec<String>> {
        let mut visitor = DataPointVisitor::new(prefix());
        visitor.visit(&value_type, &value);
        visitor.into_lines()
    }

    fn suffixes(lines: &[Vec<String>]) -> Vec<(String, String)> {
        lines
            .iter()
            .map(|l| (l[l.len() - 2].clone(), l[l.len() - 1].clone()))
            .collect()
    }

    #[test]
    fn test_scalar_single_row() {
        let lines = visit(ValueType::Number, json!(42));
        assert_eq!(lines, vec![vec!["kivuye", "P2024", "42", ""]]);
    }

    #[test]
    fn test_null_yields_nothing() {
        assert!(visit(ValueType::Number, Value::Null).is_empty());
        assert!(visit(ValueType::list_of(ValueType::Number), json!([null, null])).is_empty());
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(render_scalar(&ValueType::Bool, &json!(true)), "true");
        assert_eq!(render_scalar(&ValueType::Number, &json!(3.5)), "3.5");
        assert_eq!(render_scalar(&ValueType::Text, &json!("a, \"b\"")), "a, \"b\"");
        assert_eq!(render_scalar(&ValueType::Date, &json!("2024-03-01")), "2024-03-01");
        assert_eq!(render_scalar(&ValueType::Enum, &json!("yes")), "yes");
    }

    #[test]
    fn test_mismatched_shape_written_as_json() {
        assert_eq!(render_scalar(&ValueType::Number, &json!("42")), "\"42\"");
        let lines = visit(ValueType::list_of(ValueType::Number), json!({"a": 1}));
        assert_eq!(suffixes(&lines), vec![("{\"a\":1}".to_string(), String::new())]);
    }

    #[test]
    fn test_list_one_row_per_item() {
        let lines = visit(ValueType::list_of(ValueType::String), json!(["a", null, "c"]));
        assert_eq!(
            suffixes(&lines),
            vec![
                ("a".to_string(), "[0]".to_string()),
                ("c".to_string(), "[2]".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_follows_declaration_order() {
        let value_type = ValueType::map_of([
            ("staff", ValueType::list_of(ValueType::Number)),
            ("beds", ValueType::Number),
            ("open", ValueType::Bool),
        ]);
        let lines = visit(
            value_type,
            json!({"beds": 12, "staff": [3, 4], "open": null, "extra": 1}),
        );

        assert_eq!(
            suffixes(&lines),
            vec![
                ("3".to_string(), "staff[0]".to_string()),
                ("4".to_string(), "staff[1]".to_string()),
                ("12".to_string(), "beds".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_addresses() {
        let value_type = ValueType::list_of(ValueType::map_of([("count", ValueType::Number)]));
        let lines = visit(value_type, json!([{"count": 1}, {"count": 2}]));

        assert_eq!(
            suffixes(&lines),
            vec![
                ("1".to_string(), "[0].count".to_string()),
                ("2".to_string(), "[1].count".to_string()),
            ]
        );
    }

    #[test]
    fn test_prefix_shared_by_all_rows() {
        let lines = visit(ValueType::list_of(ValueType::Number), json!([1, 2, 3]));

        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(&line[..2], prefix().as_slice());
        }
    }

    #[test]
    fn test_empty_composite_yields_nothing() {
        assert!(visit(ValueType::list_of(ValueType::Number), json!([])).is_empty());
        assert!(visit(ValueType::map_of([("a", ValueType::Number)]), json!({})).is_empty());
    }
}
