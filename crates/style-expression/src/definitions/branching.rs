//! Conditionals: `!`, `case`, `match`, and the `error` signal.

use crate::definitions::Outputs;
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::Type;
use crate::value::StyleValue;
use serde_json::{json, Value};

/// `["error", message]`. Takes whatever type its position expects.
pub(crate) fn parse_error(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
    let Value::String(message) = &args[1] else {
        return ctx.fail_at(1, "Error message must be a string literal.");
    };
    let ty = ctx.expected_type().cloned().unwrap_or(Type::Unknown);
    Some(Expression::new(ctx.path(), ty, ExprKind::Throw(message.clone())))
}

/// `["!", value]`: boolean negation.
#[derive(Debug, Clone, PartialEq)]
pub struct Not {
    pub input: Box<Expression>,
}

impl Not {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        let input = parse(&args[1], &ctx.derive(1, Some(Type::Boolean), &[]))?;
        Some(Expression::new(
            ctx.path(),
            Type::Boolean,
            ExprKind::Not(Not {
                input: Box::new(input),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        Ok(StyleValue::Boolean(!boolean(evaluate(&self.input, ctx)?)?))
    }

    pub(crate) fn serialize(&self) -> Value {
        json!(["!", self.input.serialize()])
    }
}

/// `["case", cond, output, ..., otherwise]`: the output of the first true
/// condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub branches: Vec<(Expression, Expression)>,
    pub otherwise: Box<Expression>,
}

impl Case {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        if args.len() % 2 != 0 {
            return ctx.fail("Expected an odd number of arguments.");
        }

        let last = args.len() - 1;
        let mut outputs = Outputs(None);
        let mut branches = Vec::new();
        let mut failed = false;
        for i in (1..last).step_by(2) {
            let condition = parse(&args[i], &ctx.derive(i, Some(Type::Boolean), &[]));
            let output = outputs.parse_branch(&args[i + 1], i + 1, ctx);
            match (condition, output) {
                (Some(c), Some(o)) => branches.push((c, o)),
                _ => failed = true,
            }
        }
        let otherwise = outputs.parse_branch(&args[last], last, ctx);
        if failed {
            return None;
        }
        let otherwise = otherwise?;
        Some(Expression::new(
            ctx.path(),
            outputs.0.unwrap_or(Type::Unknown),
            ExprKind::Case(Case {
                branches,
                otherwise: Box::new(otherwise),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        for (condition, output) in &self.branches {
            if boolean(evaluate(condition, ctx)?)? {
                return evaluate(output, ctx);
            }
        }
        evaluate(&self.otherwise, ctx)
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![json!("case")];
        for (condition, output) in &self.branches {
            out.push(condition.serialize());
            out.push(output.serialize());
        }
        out.push(self.otherwise.serialize());
        Value::Array(out)
    }
}

/// `["match", input, labels, output, ..., otherwise]`: the output of the
/// first arm whose labels contain the input value.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub input: Box<Expression>,
    pub arms: Vec<(Vec<StyleValue>, Expression)>,
    pub otherwise: Box<Expression>,
}

impl Match {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        if args.len() % 2 == 0 {
            return ctx.fail("Expected an even number of arguments.");
        }

        let last = args.len() - 1;
        let mut label_ty: Option<Type> = None;
        let mut seen: Vec<StyleValue> = Vec::new();
        let mut outputs = Outputs(None);
        let mut arms = Vec::new();
        let mut failed = false;
        for i in (2..last).step_by(2) {
            let labels = parse_labels(&args[i], i, ctx, &mut label_ty, &mut seen);
            let output = outputs.parse_branch(&args[i + 1], i + 1, ctx);
            match (labels, output) {
                (Some(l), Some(o)) => arms.push((l, o)),
                _ => failed = true,
            }
        }
        let otherwise = outputs.parse_branch(&args[last], last, ctx);
        let input_ctx = match label_ty {
            Some(ty) => ctx.derive(1, Some(ty), &[]),
            None => ctx.derive_unconstrained(1, &[]),
        };
        let input = parse(&args[1], &input_ctx);
        if failed {
            return None;
        }
        let (input, otherwise) = (input?, otherwise?);
        Some(Expression::new(
            ctx.path(),
            outputs.0.unwrap_or(Type::Unknown),
            ExprKind::Match(Match {
                input: Box::new(input),
                arms,
                otherwise: Box::new(otherwise),
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let input = evaluate(&self.input, ctx)?;
        for (labels, output) in &self.arms {
            if labels.contains(&input) {
                return evaluate(output, ctx);
            }
        }
        evaluate(&self.otherwise, ctx)
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![json!("match"), self.input.serialize()];
        for (labels, output) in &self.arms {
            match labels.as_slice() {
                [single] => out.push(single.to_json()),
                many => out.push(Value::Array(many.iter().map(StyleValue::to_json).collect())),
            }
            out.push(output.serialize());
        }
        out.push(self.otherwise.serialize());
        Value::Array(out)
    }
}

fn parse_labels(
    raw: &Value,
    index: usize,
    ctx: &ParsingContext<'_>,
    label_ty: &mut Option<Type>,
    seen: &mut Vec<StyleValue>,
) -> Option<Vec<StyleValue>> {
    let raw_labels = match raw {
        Value::Array(items) if items.is_empty() => {
            return ctx.fail_at(index, "Expected at least one branch label.")
        }
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    let label_ctx = ctx.derive(index, None, &[]);
    let mut labels = Vec::with_capacity(raw_labels.len());
    for label in raw_labels {
        let ty = match label {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Type::of(label),
            other => {
                return label_ctx.fail(format!(
                    "Branch labels must be strings, numbers or booleans, but found {} instead.",
                    Type::of(other)
                ))
            }
        };
        if let Some(expected) = label_ty.as_ref() {
            if *expected != ty {
                return label_ctx.fail(format!("Expected {} but found {} instead.", expected, ty));
            }
        }
        *label_ty = Some(ty);
        let value = StyleValue::from(label);
        if seen.contains(&value) {
            return label_ctx.fail("Branch labels must be unique.");
        }
        seen.push(value.clone());
        labels.push(value);
    }
    Some(labels)
}

fn boolean(value: StyleValue) -> Result<bool, EvalError> {
    match value {
        StyleValue::Boolean(b) => Ok(b),
        other => Err(EvalError::TypeMismatch {
            expected: Type::Boolean,
            found: other.type_of(),
        }),
    }
}
