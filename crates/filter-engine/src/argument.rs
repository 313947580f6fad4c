use model::core::value::Value;

/// Request-time filter argument as parsed by the execution layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArgumentValue {
    Scalar(Value),
    List(Vec<FilterArgumentValue>),
    /// Fields in the order they were written.
    Object(Vec<(String, FilterArgumentValue)>),
}

impl FilterArgumentValue {
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FilterArgumentValue)>,
        K: Into<String>,
    {
        FilterArgumentValue::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn scalar(value: impl Into<Value>) -> Self {
        FilterArgumentValue::Scalar(value.into())
    }

    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Array(items) => {
                FilterArgumentValue::List(items.iter().map(FilterArgumentValue::from_json).collect())
            }
            serde_json::Value::Object(fields) => FilterArgumentValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), FilterArgumentValue::from_json(v)))
                    .collect(),
            ),
            other => FilterArgumentValue::Scalar(Value::from_json(other)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterArgumentValue::Scalar(Value::Null))
    }

    /// Shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            FilterArgumentValue::Scalar(v) => v.kind_name(),
            FilterArgumentValue::List(_) => "List",
            FilterArgumentValue::Object(_) => "Object",
        }
    }
}

impl From<serde_json::Value> for FilterArgumentValue {
    fn from(json: serde_json::Value) -> Self {
        FilterArgumentValue::from_json(&json)
    }
}
