//! Style property schema and the legacy function definition, both read from
//! JSON with serde.

use crate::types::Type;
use serde::Deserialize;
use serde_json::Value;

/// Schema entry for one style property.
///
/// ```
/// use style_expression::{PropertySpec, Type};
/// use serde_json::json;
///
/// let spec: PropertySpec = serde_json::from_value(json!({
///     "type": "array", "value": "number", "length": 2, "function": "interpolated"
/// })).unwrap();
/// assert_eq!(spec.value_type(), Type::array(Type::Number, Some(2)));
/// assert!(spec.is_interpolated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Element type name for arrays.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub length: Option<usize>,
    /// Enum allowlist: an array of strings or an object keyed by them.
    #[serde(default)]
    pub values: Option<Value>,
    /// `"interpolated"` for continuous properties.
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
}

impl PropertySpec {
    pub fn new(type_name: impl Into<String>) -> Self {
        PropertySpec {
            type_name: type_name.into(),
            ..PropertySpec::default()
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn interpolated(mut self) -> Self {
        self.function = Some("interpolated".to_string());
        self
    }

    pub fn is_interpolated(&self) -> bool {
        self.function.as_deref() == Some("interpolated")
    }

    /// Allowed enum values, in schema order for arrays and key order for
    /// objects.
    pub fn enum_values(&self) -> Vec<String> {
        match &self.values {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// The type an expression for this property must produce.
    pub fn value_type(&self) -> Type {
        match self.type_name.as_str() {
            "enum" => Type::enumeration(self.enum_values()),
            "array" => {
                let item = self
                    .value
                    .as_deref()
                    .and_then(Type::from_name)
                    .unwrap_or(Type::Unknown);
                Type::array(item, self.length)
            }
            name => Type::from_name(name).unwrap_or(Type::Unknown),
        }
    }
}

/// A legacy stops-based function definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopFunction {
    #[serde(default)]
    pub property: Option<String>,
    /// Explicit function kind: `categorical`, `interval` or `exponential`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub base: Option<f64>,
    #[serde(default)]
    pub color_space: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
    /// `[input, output]` pairs. Inputs are scalars, or `{zoom, value}`
    /// objects for zoom-and-property functions.
    #[serde(default)]
    pub stops: Option<Vec<(Value, Value)>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enum_values_from_array_or_object() {
        let spec: PropertySpec = serde_json::from_value(json!({
            "type": "enum", "values": ["butt", "round"]
        }))
        .unwrap();
        assert_eq!(spec.value_type(), Type::enumeration(["butt", "round"]));

        let spec: PropertySpec = serde_json::from_value(json!({
            "type": "enum", "values": {"map": {}, "viewport": {}}
        }))
        .unwrap();
        assert_eq!(spec.enum_values(), vec!["map", "viewport"]);
    }

    #[test]
    fn stop_function_fields() {
        let f: StopFunction = serde_json::from_value(json!({
            "type": "interval", "colorSpace": "hsl", "stops": [[0, "a"], [5, "b"]]
        }))
        .unwrap();
        assert_eq!(f.kind.as_deref(), Some("interval"));
        assert_eq!(f.color_space.as_deref(), Some("hsl"));
        assert_eq!(f.stops.unwrap()[1], (json!(5), json!("b")));
    }
}
