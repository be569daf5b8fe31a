//! Reads from the evaluation environment: `zoom`, `get` and `has`.

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::Type;
use crate::value::StyleValue;
use serde_json::{json, Value};

pub(crate) fn parse_zoom(_args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
    Some(Expression::new(ctx.path(), Type::Number, ExprKind::Zoom))
}

pub(crate) fn evaluate_zoom(ctx: &EvalCtx<'_>) -> Result<StyleValue, EvalError> {
    ctx.zoom.map(StyleValue::Number).ok_or(EvalError::MissingZoom)
}

/// `["get", name]`: a feature property. Missing properties are an
/// evaluation error, so a surrounding `coalesce` can fall back.
#[derive(Debug, Clone, PartialEq)]
pub struct Get {
    pub property: Box<Expression>,
}

impl Get {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let property = parse(&args[1], &ctx.derive(1, Some(Type::String), &[]))?;
        Some(Expression::new(
            ctx.path(),
            Type::Unknown,
            ExprKind::Get(Get {
                property: Box::new(property),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let name = property_name(evaluate(&self.property, ctx)?)?;
        ctx.feature
            .and_then(|f| f.property(&name))
            .map(StyleValue::from)
            .ok_or(EvalError::MissingProperty(name))
    }

    pub(crate) fn serialize(&self) -> Value {
        json!(["get", self.property.serialize()])
    }
}

/// `["has", key]` tests the feature; `["has", key, object]` tests an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Has {
    pub key: Box<Expression>,
    pub object: Option<Box<Expression>>,
}

impl Has {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let key = parse(&args[1], &ctx.derive(1, Some(Type::String), &[]));
        let object = match args.get(2) {
            Some(raw) => Some(parse(raw, &ctx.derive(2, Some(Type::Object), &[]))?),
            None => None,
        };
        Some(Expression::new(
            ctx.path(),
            Type::Boolean,
            ExprKind::Has(Has {
                key: Box::new(key?),
                object: object.map(Box::new),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let key = property_name(evaluate(&self.key, ctx)?)?;
        let found = match &self.object {
            Some(object) => match evaluate(object, ctx)? {
                StyleValue::Object(map) => map.contains_key(&key),
                other => {
                    return Err(EvalError::TypeMismatch {
                        expected: Type::Object,
                        found: other.type_of(),
                    })
                }
            },
            None => ctx.feature.is_some_and(|f| f.property(&key).is_some()),
        };
        Ok(StyleValue::Boolean(found))
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![json!("has"), self.key.serialize()];
        out.extend(self.object.as_ref().map(|o| o.serialize()));
        Value::Array(out)
    }
}

fn property_name(value: StyleValue) -> Result<String, EvalError> {
    match value {
        StyleValue::String(s) => Ok(s),
        other => Err(EvalError::TypeMismatch {
            expected: Type::String,
            found: other.type_of(),
        }),
    }
}
