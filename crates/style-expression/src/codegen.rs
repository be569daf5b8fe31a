//! Expression compilation.
//!
//! Compiling does not generate code; it records what the expression depends
//! on and folds constant expressions to their value up front, so that
//! evaluating a constant property per feature is a clone.

use crate::error::EvalError;
use crate::eval_ctx::{EvalCtx, Feature};
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::types::Type;
use crate::value::StyleValue;
use std::sync::Arc;

/// A compiled expression that can be evaluated repeatedly for different
/// zoom levels and features.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    expression: Arc<Expression>,
    zoom_constant: bool,
    feature_constant: bool,
}

impl CompiledExpression {
    /// Static result type.
    pub fn result_type(&self) -> &Type {
        &self.expression.ty
    }

    /// The (possibly folded) expression tree.
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn is_zoom_constant(&self) -> bool {
        self.zoom_constant
    }

    pub fn is_feature_constant(&self) -> bool {
        self.feature_constant
    }

    pub fn evaluate(
        &self,
        zoom: Option<f64>,
        feature: Option<&dyn Feature>,
    ) -> Result<StyleValue, EvalError> {
        if let ExprKind::Literal(value) = &self.expression.kind {
            return Ok(value.clone());
        }
        let mut ctx = EvalCtx::new(zoom, feature);
        evaluate(&self.expression, &mut ctx)
    }
}

/// Compiles a parsed expression.
///
/// Expressions that depend on neither zoom nor feature data are evaluated
/// once here. If that evaluation fails the tree is kept as is, so the error
/// surfaces on every call rather than being lost.
#[tracing::instrument(level = "debug", skip(expression), fields(ty = %expression.ty))]
pub fn compile(expression: Expression) -> CompiledExpression {
    let zoom_constant = expression.is_zoom_constant();
    let feature_constant = expression.is_feature_constant();
    let mut expression = expression;

    if zoom_constant && feature_constant && !matches!(expression.kind, ExprKind::Literal(_)) {
        let mut ctx = EvalCtx::new(None, None);
        match evaluate(&expression, &mut ctx) {
            Ok(value) => {
                tracing::trace!("folded constant expression");
                expression = Expression::new(
                    &expression.path,
                    expression.ty.clone(),
                    ExprKind::Literal(value),
                );
            }
            Err(error) => tracing::trace!(%error, "constant expression did not fold"),
        }
    }

    CompiledExpression {
        expression: Arc::new(expression),
        zoom_constant,
        feature_constant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_expression, ParseOptions};
    use serde_json::json;

    fn compiled(raw: serde_json::Value) -> CompiledExpression {
        compile(parse_expression(&raw, &ParseOptions::default()).unwrap())
    }

    #[test]
    fn constant_expressions_fold() {
        let c = compiled(json!(["case", ["!", true], 1, 2]));
        assert!(c.is_zoom_constant() && c.is_feature_constant());
        assert_eq!(c.expression().kind, ExprKind::Literal(StyleValue::Number(2.0)));
        assert_eq!(c.evaluate(None, None), Ok(StyleValue::Number(2.0)));
    }

    #[test]
    fn failing_constants_stay_unfolded() {
        let c = compiled(json!(["number", "a"]));
        assert!(matches!(c.expression().kind, ExprKind::Assertion(_)));
        assert!(c.evaluate(None, None).is_err());
    }

    #[test]
    fn dependencies_are_recorded() {
        let c = compiled(json!(["curve", ["linear"], ["zoom"], 0, 0, 10, 100]));
        assert!(!c.is_zoom_constant());
        assert!(c.is_feature_constant());
        assert_eq!(c.evaluate(Some(5.0), None), Ok(StyleValue::Number(50.0)));
        assert_eq!(c.evaluate(None, None), Err(EvalError::MissingZoom));

        let c = compiled(json!(["get", "name"]));
        assert!(c.is_zoom_constant());
        assert!(!c.is_feature_constant());
    }
}
