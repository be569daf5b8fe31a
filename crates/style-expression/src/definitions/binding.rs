//! Scoped bindings: `["let", name, value, ..., body]` and `["var", name]`.

use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::Type;
use crate::value::StyleValue;
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};

fn identifier_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[A-Za-z0-9_]+$").expect("valid identifier pattern"))
}

/// Whether `name` can be bound by `let`.
pub fn is_valid_name(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// Binds values to names for the rest of its own argument list and its body.
///
/// Each value is computed once per evaluation, in order, before the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub bindings: Vec<(String, Arc<Expression>)>,
    pub body: Box<Expression>,
}

impl Let {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        if args.len() % 2 != 0 {
            return ctx.fail(format!(
                "Expected an odd number of arguments, but found {} instead.",
                args.len() - 1
            ));
        }

        let body_index = args.len() - 1;
        let mut bindings: Vec<(String, Arc<Expression>)> = Vec::new();
        let mut failed = false;
        for i in (1..body_index).step_by(2) {
            let name = match &args[i] {
                Value::String(s) if is_valid_name(s) => Some(s),
                Value::String(_) => {
                    ctx.fail_at::<()>(
                        i,
                        "Variable names must contain only alphanumeric characters or '_'.",
                    );
                    None
                }
                other => {
                    ctx.fail_at::<()>(
                        i,
                        format!("Expected string, but found {} instead.", Type::of(other)),
                    );
                    None
                }
            };
            // Earlier bindings of this same `let` are visible to later values.
            let value_ctx = ctx.derive_unconstrained(i + 1, &bindings);
            let value = parse(&args[i + 1], &value_ctx);
            match (name, value) {
                (Some(name), Some(value)) => bindings.push((name.clone(), Arc::new(value))),
                // Keep the name in scope so later references report their own errors only.
                (Some(name), None) => {
                    failed = true;
                    let placeholder = Expression::new(
                        value_ctx.path(),
                        Type::Unknown,
                        ExprKind::Literal(StyleValue::Null),
                    );
                    bindings.push((name.clone(), Arc::new(placeholder)));
                }
                (None, _) => failed = true,
            }
        }

        let body = parse(&args[body_index], &ctx.derive(body_index, None, &bindings));
        if failed {
            return None;
        }
        let body = body?;
        Some(Expression::new(
            ctx.path(),
            body.ty.clone(),
            ExprKind::Let(Let {
                bindings,
                body: Box::new(body),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let mark = ctx.vars.len();
        let result = self.evaluate_in_scope(ctx);
        ctx.vars.truncate(mark);
        result
    }

    fn evaluate_in_scope(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        for (name, value) in &self.bindings {
            let v = evaluate(value, ctx)?;
            ctx.vars.push(name, v);
        }
        evaluate(&self.body, ctx)
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![json!("let")];
        for (name, value) in &self.bindings {
            out.push(json!(name));
            out.push(value.serialize());
        }
        out.push(self.body.serialize());
        Value::Array(out)
    }
}

/// Reference to a name bound by an enclosing `let`.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
}

impl Var {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let Value::String(name) = &args[1] else {
            return ctx.fail_at(1, "Variable name must be a string literal.");
        };
        let Some(bound) = ctx.lookup(name) else {
            return ctx.fail_at(
                1,
                format!(
                    r#"Unknown variable "{}". Make sure "{}" has been bound in an enclosing "let" expression before using it."#,
                    name, name
                ),
            );
        };
        Some(Expression::new(
            ctx.path(),
            bound.ty.clone(),
            ExprKind::Var(Var { name: name.clone() }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        ctx.vars
            .get(&self.name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(self.name.clone()))
    }

    pub(crate) fn serialize(&self) -> Value {
        json!(["var", self.name])
    }
}
