//! The parse dispatcher and the public parse entry point.

use crate::definitions::assertion::{ArrayAssertion, Assertion, ParseColor};
use crate::definitions::binding::{Let, Var};
use crate::definitions::branching::{self, Case, Match, Not};
use crate::definitions::coalesce::Coalesce;
use crate::definitions::curve::Curve;
use crate::definitions::lookup::{self, Get, Has};
use crate::definitions::{literal, Operator};
use crate::error::ParseError;
use crate::expression::Expression;
use crate::parsing_ctx::ParsingContext;
use crate::types::{is_subtype, Type};
use serde_json::Value;
use std::cell::RefCell;

/// Options for [`parse_expression`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Type the whole expression must produce.
    pub expected: Option<Type>,
    /// Leading path element for diagnostics, usually the style property name.
    pub key: Option<String>,
}

impl ParseOptions {
    pub fn expecting(ty: Type) -> Self {
        ParseOptions {
            expected: Some(ty),
            key: None,
        }
    }
}

/// Parses raw expression data into a typed tree.
///
/// Every user-data problem found anywhere in the input is reported; the
/// error list is returned as one batch.
#[tracing::instrument(level = "debug", skip(raw))]
pub fn parse_expression(raw: &Value, options: &ParseOptions) -> Result<Expression, Vec<ParseError>> {
    let errors = RefCell::new(Vec::new());
    let mut ctx = ParsingContext::new(&errors, options.expected.clone());
    if let Some(key) = &options.key {
        ctx = ctx.with_key(key.clone());
    }
    let parsed = parse(raw, &ctx);
    drop(ctx);

    let errors = errors.into_inner();
    match parsed {
        Some(expr) if errors.is_empty() => Ok(expr),
        _ => {
            tracing::debug!(count = errors.len(), "expression failed to parse");
            Err(errors)
        }
    }
}

/// Parses one node under `ctx` and checks it against the context's
/// expected type.
pub(crate) fn parse(raw: &Value, ctx: &ParsingContext<'_>) -> Option<Expression> {
    let expr = parse_node(raw, ctx)?;
    if let Some(expected) = ctx.expected_type() {
        if !is_subtype(expected, &expr.ty) {
            return ctx.fail(format!(
                "Expected {} but found {} instead.",
                expected, expr.ty
            ));
        }
    }
    Some(expr)
}

fn parse_node(raw: &Value, ctx: &ParsingContext<'_>) -> Option<Expression> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(_) => {
            return ctx.fail(r#"Bare objects invalid. Use ["literal", {...}] instead."#)
        }
        scalar => return literal::parse_scalar(scalar, ctx),
    };
    let Some(head) = items.first() else {
        return ctx.fail(
            r#"Expected an array with at least one element. If you wanted a literal array, use ["literal", []]."#,
        );
    };
    let Value::String(tag) = head else {
        return ctx.fail_at(
            0,
            format!(
                r#"Expression name must be a string, but found {} instead. If you wanted a literal array, use ["literal", [...]]."#,
                Type::of(head)
            ),
        );
    };
    let Some(op) = Operator::from_tag(tag) else {
        return ctx.fail_at(
            0,
            format!(
                r#"Unknown expression "{}". If you wanted a literal array, use ["literal", [...]]."#,
                tag
            ),
        );
    };
    if let Err(message) = op.arity().check(items.len()) {
        return ctx.fail(message);
    }

    match op {
        Operator::Literal => literal::parse(items, ctx),
        Operator::Zoom => lookup::parse_zoom(items, ctx),
        Operator::Get => Get::parse(items, ctx),
        Operator::Has => Has::parse(items, ctx),
        Operator::Var => Var::parse(items, ctx),
        Operator::Let => Let::parse(items, ctx),
        Operator::Coalesce => Coalesce::parse(items, ctx),
        Operator::Error => branching::parse_error(items, ctx),
        Operator::String => Assertion::parse(Type::String, items, ctx),
        Operator::Number => Assertion::parse(Type::Number, items, ctx),
        Operator::Boolean => Assertion::parse(Type::Boolean, items, ctx),
        Operator::Object => Assertion::parse(Type::Object, items, ctx),
        Operator::Array => ArrayAssertion::parse(items, ctx),
        Operator::ParseColor => ParseColor::parse(items, ctx),
        Operator::Not => Not::parse(items, ctx),
        Operator::Case => Case::parse(items, ctx),
        Operator::Match => Match::parse(items, ctx),
        Operator::Curve => Curve::parse(items, ctx),
    }
}
