use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    /// Builds a row from a JSON object, keeping the document's field order.
    /// Anything other than an object yields an empty row.
    pub fn from_json(entity: &str, json: &serde_json::Value) -> Self {
        let field_values = json
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .map(|(name, value)| FieldValue::new(name, Value::from_json(value)))
                    .collect()
            })
            .unwrap_or_default();

        RowData::new(entity, field_values)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// Borrowing lookup; `None` for missing fields and SQL-style absent values.
    pub fn value_ref(&self, field: &str) -> Option<&Value> {
        self.get(field).and_then(|f| f.value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let row = RowData::new("users", vec![FieldValue::new("Age", Value::Int(30))]);
        assert_eq!(row.get_value("age"), Value::Int(30));
        assert_eq!(row.value_ref("AGE"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let row = RowData::new(
            "users",
            vec![FieldValue {
                name: "nickname".to_string(),
                value: None,
            }],
        );
        assert_eq!(row.get_value("nickname"), Value::Null);
        assert_eq!(row.get_value("unknown"), Value::Null);
        assert!(row.value_ref("nickname").is_none());
    }

    #[test]
    fn test_from_json_non_object_is_empty() {
        let row = RowData::from_json("users", &serde_json::json!([1, 2]));
        assert!(row.field_values.is_empty());
        assert_eq!(row.entity, "users");
    }
}
