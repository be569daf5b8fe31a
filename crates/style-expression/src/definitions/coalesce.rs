//! `["coalesce", a, b, ...]`: the first argument that yields a value.

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::{unify, Type};
use crate::value::StyleValue;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Coalesce {
    pub args: Vec<Expression>,
}

impl Coalesce {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let mut output: Option<Type> = None;
        let mut parsed = Vec::with_capacity(args.len() - 1);
        let mut failed = false;
        for (i, raw) in args.iter().enumerate().skip(1) {
            let expected = output.clone().filter(|t| *t != Type::Unknown);
            // A failed argument is reported but its siblings still get parsed.
            let Some(arg) = parse(raw, &ctx.derive(i, expected, &[])) else {
                failed = true;
                continue;
            };
            output = match &output {
                None => Some(arg.ty.clone()),
                Some(current) => match unify(current, &arg.ty) {
                    Some(t) => Some(t),
                    None => {
                        return ctx.fail_at(
                            i,
                            format!("Expected {} but found {} instead.", current, arg.ty),
                        )
                    }
                },
            };
            parsed.push(arg);
        }
        if failed {
            return None;
        }
        let ty = output?;
        Some(Expression::new(
            ctx.path(),
            ty,
            ExprKind::Coalesce(Coalesce { args: parsed }),
        ))
    }

    /// Evaluates arguments left to right and stops at the first non-null
    /// result. Errors from earlier arguments are dropped once a later one
    /// succeeds; if none does, the last error is returned.
    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let mut last_error = None;
        for arg in &self.args {
            match evaluate(arg, ctx) {
                Ok(value) if value.is_null() => {}
                Ok(value) => return Ok(value),
                Err(e) => last_error = Some(e),
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(StyleValue::Null),
        }
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![json!("coalesce")];
        out.extend(self.args.iter().map(Expression::serialize));
        Value::Array(out)
    }
}
