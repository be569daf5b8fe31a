//! Constant values: bare scalars and `["literal", value]`.

use crate::expression::{ExprKind, Expression};
use crate::parsing_ctx::ParsingContext;
use crate::types::Type;
use crate::value::StyleValue;
use serde_json::{json, Value};

/// Parses `["literal", value]`. Any JSON value is accepted verbatim.
pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
    Some(constant(&args[1], ctx))
}

/// Parses a bare scalar (`null`, boolean, number or string).
pub(crate) fn parse_scalar(value: &Value, ctx: &ParsingContext<'_>) -> Option<Expression> {
    Some(constant(value, ctx))
}

fn constant(value: &Value, ctx: &ParsingContext<'_>) -> Expression {
    // An array literal takes the expected array type when it fits, so that
    // e.g. `[1, 2]` satisfies `array<number, 2>` without an assertion.
    let ty = match ctx.expected_type() {
        Some(expected @ Type::Array { .. }) if expected.is_assignable(value) => expected.clone(),
        _ => Type::of(value),
    };
    Expression::new(ctx.path(), ty, ExprKind::Literal(StyleValue::from(value)))
}

pub(crate) fn serialize(value: &StyleValue) -> Value {
    match value {
        StyleValue::Array(_) | StyleValue::Object(_) => json!(["literal", value.to_json()]),
        StyleValue::Color(c) => json!(["parse-color", c.to_string()]),
        scalar => scalar.to_json(),
    }
}
