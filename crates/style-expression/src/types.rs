//! Value types used to validate expressions ahead of evaluation.

use crate::color::Color;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Static type of an expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Null,
    Number,
    String,
    Boolean,
    Color,
    Object,
    /// Array with an element type and an optional fixed length.
    Array {
        item: Box<Type>,
        length: Option<usize>,
    },
    /// String restricted to an allowlist.
    Enum(BTreeSet<String>),
    /// Not yet known. Unifies with anything.
    Unknown,
}

impl Type {
    pub fn array(item: Type, length: Option<usize>) -> Self {
        Type::Array {
            item: Box::new(item),
            length,
        }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Type::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Resolves a type name as written in expression data (`"number"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Type::Null),
            "number" => Some(Type::Number),
            "string" => Some(Type::String),
            "boolean" => Some(Type::Boolean),
            "color" => Some(Type::Color),
            "object" => Some(Type::Object),
            "value" => Some(Type::Unknown),
            _ => None,
        }
    }

    /// Infers the type of a raw JSON value. Arrays get a fixed length and
    /// the unified type of their items (`Unknown` when the items disagree).
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Boolean,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::Object(_) => Type::Object,
            Value::Array(items) => {
                let mut item = Type::Unknown;
                for v in items {
                    match unify(&item, &Type::of(v)) {
                        Some(t) => item = t,
                        None => {
                            item = Type::Unknown;
                            break;
                        }
                    }
                }
                Type::array(item, Some(items.len()))
            }
        }
    }

    /// Whether a raw JSON value inhabits this type.
    pub fn is_assignable(&self, value: &Value) -> bool {
        match (self, value) {
            (Type::Unknown, _) => true,
            (Type::Null, Value::Null) => true,
            (Type::Number, Value::Number(_)) => true,
            (Type::String, Value::String(_)) => true,
            (Type::Boolean, Value::Bool(_)) => true,
            (Type::Object, Value::Object(_)) => true,
            (Type::Color, Value::String(s)) => Color::parse(s).is_some(),
            (Type::Enum(allowed), Value::String(s)) => allowed.contains(s),
            (Type::Array { item, length }, Value::Array(items)) => {
                length.map_or(true, |n| n == items.len())
                    && items.iter().all(|v| item.is_assignable(v))
            }
            _ => false,
        }
    }

    /// Whether values of this type can be interpolated by a continuous curve.
    pub fn is_interpolatable(&self) -> bool {
        match self {
            Type::Number | Type::Color => true,
            Type::Array { item, length } => **item == Type::Number && length.is_some(),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Null => f.write_str("null"),
            Type::Number => f.write_str("number"),
            Type::String => f.write_str("string"),
            Type::Boolean => f.write_str("boolean"),
            Type::Color => f.write_str("color"),
            Type::Object => f.write_str("object"),
            Type::Unknown => f.write_str("value"),
            Type::Array { item, length } => match length {
                Some(n) => write!(f, "array<{}, {}>", item, n),
                None => write!(f, "array<{}>", item),
            },
            Type::Enum(values) => {
                let names: Vec<_> = values.iter().map(|v| format!("\"{}\"", v)).collect();
                write!(f, "enum<{}>", names.join(" | "))
            }
        }
    }
}

/// Computes the most specific type compatible with both operands.
///
/// Returns `None` when the types cannot be reconciled.
pub fn unify(a: &Type, b: &Type) -> Option<Type> {
    match (a, b) {
        (Type::Unknown, other) | (other, Type::Unknown) => Some(other.clone()),
        (
            Type::Array {
                item: ia,
                length: la,
            },
            Type::Array {
                item: ib,
                length: lb,
            },
        ) => {
            let item = unify(ia, ib)?;
            let length = match (la, lb) {
                (Some(x), Some(y)) if x != y => return None,
                (Some(x), _) | (_, Some(x)) => Some(*x),
                (None, None) => None,
            };
            Some(Type::array(item, length))
        }
        (x, y) if x == y => Some(x.clone()),
        _ => None,
    }
}

/// Checks a node's type against an expectation imposed from above.
///
/// Looser than [`unify`]: a `string` satisfies an `enum` expectation, the
/// allowlist being enforced when the value is produced.
pub fn is_subtype(expected: &Type, actual: &Type) -> bool {
    match (expected, actual) {
        (Type::Enum(_), Type::String) => true,
        (
            Type::Array {
                item: ei,
                length: el,
            },
            Type::Array {
                item: ai,
                length: al,
            },
        ) => is_subtype(ei, ai) && (el.is_none() || el == al || al.is_none()),
        _ => unify(expected, actual).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn arb_type() -> impl Strategy<Value = Type> {
        let leaf = prop_oneof![
            Just(Type::Null),
            Just(Type::Number),
            Just(Type::String),
            Just(Type::Boolean),
            Just(Type::Color),
            Just(Type::Object),
            Just(Type::Unknown),
            prop::collection::btree_set("[a-c]", 1..3).prop_map(Type::Enum),
        ];
        leaf.prop_recursive(3, 12, 1, |inner| {
            (inner, prop::option::of(1usize..4)).prop_map(|(item, length)| Type::array(item, length))
        })
    }

    proptest! {
        #[test]
        fn unify_is_commutative(a in arb_type(), b in arb_type()) {
            prop_assert_eq!(unify(&a, &b), unify(&b, &a));
        }

        #[test]
        fn unify_with_unknown_is_identity(a in arb_type()) {
            prop_assert_eq!(unify(&Type::Unknown, &a), Some(a.clone()));
        }
    }

    #[test]
    fn arrays_unify_on_items_and_length() {
        let fixed = Type::array(Type::Number, Some(2));
        let open = Type::array(Type::Unknown, None);
        assert_eq!(unify(&fixed, &open), Some(fixed.clone()));
        assert_eq!(unify(&fixed, &Type::array(Type::Number, Some(3))), None);
        assert_eq!(unify(&fixed, &Type::array(Type::String, Some(2))), None);
    }

    #[test]
    fn enums_only_unify_with_the_same_allowlist() {
        let a = Type::enumeration(["left", "right"]);
        let b = Type::enumeration(["left"]);
        assert_eq!(unify(&a, &a), Some(a.clone()));
        assert_eq!(unify(&a, &b), None);
        assert_eq!(unify(&a, &Type::String), None);
        assert!(is_subtype(&a, &Type::String));
    }

    #[test]
    fn assignability() {
        assert!(Type::Color.is_assignable(&json!("#ff0000")));
        assert!(!Type::Color.is_assignable(&json!("not a color")));
        assert!(Type::array(Type::Number, Some(2)).is_assignable(&json!([1, 2])));
        assert!(!Type::array(Type::Number, Some(2)).is_assignable(&json!([1, 2, 3])));
        assert!(!Type::array(Type::Number, None).is_assignable(&json!([1, "a"])));
        assert!(Type::enumeration(["a"]).is_assignable(&json!("a")));
        assert!(!Type::enumeration(["a"]).is_assignable(&json!("b")));
    }

    #[test]
    fn display() {
        assert_eq!(Type::array(Type::Number, Some(2)).to_string(), "array<number, 2>");
        assert_eq!(Type::array(Type::String, None).to_string(), "array<string>");
        assert_eq!(Type::enumeration(["b", "a"]).to_string(), "enum<\"a\" | \"b\">");
    }

    #[test]
    fn inferred_array_types() {
        assert_eq!(Type::of(&json!([1, 2])), Type::array(Type::Number, Some(2)));
        assert_eq!(Type::of(&json!([1, "a"])), Type::array(Type::Unknown, Some(2)));
        assert_eq!(Type::of(&json!([])), Type::array(Type::Unknown, Some(0)));
    }
}
