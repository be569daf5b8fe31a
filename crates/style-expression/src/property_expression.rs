//! End-to-end construction of a style property's expression.

use crate::codegen::{compile, CompiledExpression};
use crate::convert::convert_function;
use crate::error::{EvalError, StyleExpressionError};
use crate::eval_ctx::Feature;
use crate::parse::{parse_expression, ParseOptions};
use crate::property_spec::PropertySpec;
use crate::value::StyleValue;
use serde_json::Value;

/// A compiled expression for one style property, type checked against the
/// property's schema.
#[derive(Debug, Clone)]
pub struct PropertyExpression {
    compiled: CompiledExpression,
}

impl PropertyExpression {
    /// Builds the expression for `raw`, which is either expression data or
    /// a legacy function object.
    ///
    /// ```
    /// use style_expression::{PropertyExpression, PropertySpec, StyleValue};
    /// use serde_json::json;
    ///
    /// let spec = PropertySpec::new("number").with_default(json!(1)).interpolated();
    /// let width = PropertyExpression::create(
    ///     &json!({"stops": [[0, 0], [10, 20]]}),
    ///     &spec,
    /// ).unwrap();
    /// assert_eq!(width.evaluate(Some(5.0), None), Ok(StyleValue::Number(10.0)));
    /// ```
    pub fn create(raw: &Value, spec: &PropertySpec) -> Result<Self, StyleExpressionError> {
        Self::create_with_key(raw, spec, None)
    }

    /// Like [`create`](Self::create), with the property name prefixed to
    /// diagnostic paths.
    pub fn create_with_key(
        raw: &Value,
        spec: &PropertySpec,
        key: Option<&str>,
    ) -> Result<Self, StyleExpressionError> {
        let converted;
        let raw = if raw.is_object() {
            converted = convert_function(raw, spec)?;
            &converted
        } else {
            raw
        };
        let options = ParseOptions {
            expected: Some(spec.value_type()),
            key: key.map(str::to_string),
        };
        let expression = parse_expression(raw, &options).map_err(StyleExpressionError::Parse)?;
        Ok(PropertyExpression {
            compiled: compile(expression),
        })
    }

    pub fn compiled(&self) -> &CompiledExpression {
        &self.compiled
    }

    pub fn evaluate(
        &self,
        zoom: Option<f64>,
        feature: Option<&dyn Feature>,
    ) -> Result<StyleValue, EvalError> {
        self.compiled.evaluate(zoom, feature)
    }

    /// Expression data equivalent to this property expression.
    pub fn serialize(&self) -> Value {
        self.compiled.expression().serialize()
    }
}
