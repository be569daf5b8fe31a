//! The tree-walking evaluator.

use crate::definitions::lookup;
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::expression::{ExprKind, Expression};
use crate::value::StyleValue;

/// Evaluates a parsed expression against an execution context.
///
/// Each node variant delegates to its definition; only constants and the
/// `error` signal are handled inline.
pub fn evaluate(expr: &Expression, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
    match &expr.kind {
        ExprKind::Literal(value) => Ok(value.clone()),
        ExprKind::Zoom => lookup::evaluate_zoom(ctx),
        ExprKind::Get(n) => n.evaluate(ctx),
        ExprKind::Has(n) => n.evaluate(ctx),
        ExprKind::Var(n) => n.evaluate(ctx),
        ExprKind::Let(n) => n.evaluate(ctx),
        ExprKind::Coalesce(n) => n.evaluate(ctx),
        ExprKind::Throw(message) => Err(EvalError::Thrown(message.clone())),
        ExprKind::Assertion(n) => n.evaluate(ctx),
        ExprKind::ArrayAssertion(n) => n.evaluate(ctx),
        ExprKind::ParseColor(n) => n.evaluate(ctx),
        ExprKind::Not(n) => n.evaluate(ctx),
        ExprKind::Case(n) => n.evaluate(ctx),
        ExprKind::Match(n) => n.evaluate(ctx),
        ExprKind::Curve(n) => n.evaluate(ctx),
    }
}
