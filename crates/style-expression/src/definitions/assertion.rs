//! Runtime type assertions and coercions: `string`, `number`, `boolean`,
//! `object`, `array` and `parse-color`.

use crate::color::Color;
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::Type;
use crate::value::StyleValue;
use serde_json::{json, Value};

/// `[type, value, ...fallbacks]`: the first argument whose value has the
/// asserted type.
#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    pub ty: Type,
    pub args: Vec<Expression>,
}

impl Assertion {
    pub(crate) fn parse(ty: Type, args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let mut parsed = Vec::with_capacity(args.len() - 1);
        for (i, raw) in args.iter().enumerate().skip(1) {
            parsed.push(parse(raw, &ctx.derive_unconstrained(i, &[])));
        }
        let args = parsed.into_iter().collect::<Option<Vec<_>>>()?;
        Some(Expression::new(
            ctx.path(),
            ty.clone(),
            ExprKind::Assertion(Assertion { ty, args }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let mut found = Type::Unknown;
        for arg in &self.args {
            let value = evaluate(arg, ctx)?;
            found = value.type_of();
            if found == self.ty {
                return Ok(value);
            }
        }
        Err(EvalError::TypeMismatch {
            expected: self.ty.clone(),
            found,
        })
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![json!(self.ty.to_string())];
        out.extend(self.args.iter().map(Expression::serialize));
        Value::Array(out)
    }
}

/// `["array", (item, (length,)?)? value]`: checks an array's element type
/// and length.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAssertion {
    pub item: Type,
    pub length: Option<usize>,
    pub input: Box<Expression>,
}

impl ArrayAssertion {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let last = args.len() - 1;
        let item = if last >= 2 {
            match args[1].as_str().and_then(Type::from_name) {
                Some(t @ (Type::String | Type::Number | Type::Boolean | Type::Unknown)) => t,
                _ => {
                    return ctx.fail_at(
                        1,
                        r#"The item type argument of "array" must be one of string, number, boolean"#,
                    )
                }
            }
        } else {
            Type::Unknown
        };
        let length = if last == 3 {
            match args[2].as_u64() {
                Some(n) if n > 0 => Some(n as usize),
                _ => {
                    return ctx.fail_at(
                        2,
                        r#"The length argument to "array" must be a positive integer literal"#,
                    )
                }
            }
        } else {
            None
        };
        let input = parse(&args[last], &ctx.derive_unconstrained(last, &[]))?;
        Some(Expression::new(
            ctx.path(),
            Type::array(item.clone(), length),
            ExprKind::ArrayAssertion(ArrayAssertion {
                item,
                length,
                input: Box::new(input),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let value = evaluate(&self.input, ctx)?;
        let matches = match &value {
            StyleValue::Array(items) => {
                self.length.map_or(true, |n| n == items.len())
                    && (self.item == Type::Unknown || items.iter().all(|v| v.type_of() == self.item))
            }
            _ => false,
        };
        if matches {
            Ok(value)
        } else {
            Err(EvalError::TypeMismatch {
                expected: Type::array(self.item.clone(), self.length),
                found: value.type_of(),
            })
        }
    }

    pub(crate) fn serialize(&self) -> Value {
        let input = self.input.serialize();
        match (&self.item, self.length) {
            (Type::Unknown, None) => json!(["array", input]),
            (item, None) => json!(["array", item.to_string(), input]),
            (item, Some(n)) => json!(["array", item.to_string(), n, input]),
        }
    }
}

/// `["parse-color", value]`: parses a CSS color string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseColor {
    pub input: Box<Expression>,
}

impl ParseColor {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let input = parse(&args[1], &ctx.derive(1, Some(Type::String), &[]))?;
        Some(Expression::new(
            ctx.path(),
            Type::Color,
            ExprKind::ParseColor(ParseColor {
                input: Box::new(input),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        match evaluate(&self.input, ctx)? {
            StyleValue::String(s) => Color::parse(&s)
                .map(StyleValue::Color)
                .ok_or(EvalError::InvalidColor(s)),
            color @ StyleValue::Color(_) => Ok(color),
            other => Err(EvalError::TypeMismatch {
                expected: Type::String,
                found: other.type_of(),
            }),
        }
    }

    pub(crate) fn serialize(&self) -> Value {
        json!(["parse-color", self.input.serialize()])
    }
}
