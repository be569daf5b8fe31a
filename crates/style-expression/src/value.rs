use crate::color::Color;
use crate::types::Type;
use serde_json::Value;
use std::collections::BTreeMap;

/// A value produced by evaluating an expression.
///
/// Mirrors the JSON data model, plus `Color` which only exists after
/// `parse-color` (or color interpolation) ran.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Color(Color),
    Array(Vec<StyleValue>),
    Object(BTreeMap<String, StyleValue>),
}

impl StyleValue {
    /// Runtime type of the value. Array items are typed by their first
    /// element, which is enough for assertion diagnostics.
    pub fn type_of(&self) -> Type {
        match self {
            StyleValue::Null => Type::Null,
            StyleValue::Boolean(_) => Type::Boolean,
            StyleValue::Number(_) => Type::Number,
            StyleValue::String(_) => Type::String,
            StyleValue::Color(_) => Type::Color,
            StyleValue::Object(_) => Type::Object,
            StyleValue::Array(items) => {
                let item = items.first().map_or(Type::Unknown, StyleValue::type_of);
                Type::array(item, Some(items.len()))
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StyleValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts back to JSON. Colors become `rgba(...)` strings.
    pub fn to_json(&self) -> Value {
        match self {
            StyleValue::Null => Value::Null,
            StyleValue::Boolean(b) => Value::Bool(*b),
            StyleValue::Number(n) => number_to_json(*n),
            StyleValue::String(s) => Value::String(s.clone()),
            StyleValue::Color(c) => Value::String(c.to_string()),
            StyleValue::Array(items) => Value::Array(items.iter().map(StyleValue::to_json).collect()),
            StyleValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for StyleValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => StyleValue::Null,
            Value::Bool(b) => StyleValue::Boolean(*b),
            Value::Number(n) => StyleValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => StyleValue::String(s.clone()),
            Value::Array(items) => StyleValue::Array(items.iter().map(StyleValue::from).collect()),
            Value::Object(map) => StyleValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), StyleValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for StyleValue {
    fn from(v: Value) -> Self {
        StyleValue::from(&v)
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Boolean(b)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::String(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::String(s)
    }
}

impl From<Color> for StyleValue {
    fn from(c: Color) -> Self {
        StyleValue::Color(c)
    }
}

/// JSON form of a number: integral values are written as integers, so that
/// `5` survives a parse/serialize round trip as `5` rather than `5.0`.
/// Non-finite numbers become `null`.
pub(crate) fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
