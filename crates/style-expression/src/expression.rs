//! The typed expression tree.

use crate::definitions::assertion::{ArrayAssertion, Assertion, ParseColor};
use crate::definitions::binding::{Let, Var};
use crate::definitions::branching::{Case, Match, Not};
use crate::definitions::coalesce::Coalesce;
use crate::definitions::curve::Curve;
use crate::definitions::literal;
use crate::definitions::lookup::{Get, Has};
use crate::parsing_ctx::Path;
use crate::types::Type;
use crate::value::StyleValue;
use serde_json::{json, Value};

/// A parsed, type-checked expression node. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Where the node was found, for diagnostics.
    pub path: Path,
    /// Static result type.
    pub ty: Type,
    pub kind: ExprKind,
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(StyleValue),
    Zoom,
    Get(Get),
    Has(Has),
    Var(Var),
    Let(Let),
    Coalesce(Coalesce),
    /// Always fails at evaluation with the given message.
    Throw(String),
    Assertion(Assertion),
    ArrayAssertion(ArrayAssertion),
    ParseColor(ParseColor),
    Not(Not),
    Case(Case),
    Match(Match),
    Curve(Curve),
}

impl Expression {
    pub(crate) fn new(path: &Path, ty: Type, kind: ExprKind) -> Self {
        Expression {
            path: path.clone(),
            ty,
            kind,
        }
    }

    /// Converts the node back to its JSON array form.
    pub fn serialize(&self) -> Value {
        match &self.kind {
            ExprKind::Literal(v) => literal::serialize(v),
            ExprKind::Zoom => json!(["zoom"]),
            ExprKind::Get(n) => n.serialize(),
            ExprKind::Has(n) => n.serialize(),
            ExprKind::Var(n) => n.serialize(),
            ExprKind::Let(n) => n.serialize(),
            ExprKind::Coalesce(n) => n.serialize(),
            ExprKind::Throw(message) => json!(["error", message]),
            ExprKind::Assertion(n) => n.serialize(),
            ExprKind::ArrayAssertion(n) => n.serialize(),
            ExprKind::ParseColor(n) => n.serialize(),
            ExprKind::Not(n) => n.serialize(),
            ExprKind::Case(n) => n.serialize(),
            ExprKind::Match(n) => n.serialize(),
            ExprKind::Curve(n) => n.serialize(),
        }
    }

    /// Direct children in declaration order.
    pub fn children(&self) -> Vec<&Expression> {
        let mut out = Vec::new();
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Zoom | ExprKind::Var(_) | ExprKind::Throw(_) => {}
            ExprKind::Get(n) => out.push(&*n.property),
            ExprKind::Has(n) => {
                out.push(&*n.key);
                out.extend(n.object.as_deref());
            }
            ExprKind::Let(n) => {
                out.extend(n.bindings.iter().map(|(_, e)| &**e));
                out.push(&*n.body);
            }
            ExprKind::Coalesce(n) => out.extend(n.args.iter()),
            ExprKind::Assertion(n) => out.extend(n.args.iter()),
            ExprKind::ArrayAssertion(n) => out.push(&*n.input),
            ExprKind::ParseColor(n) => out.push(&*n.input),
            ExprKind::Not(n) => out.push(&*n.input),
            ExprKind::Case(n) => {
                for (condition, output) in &n.branches {
                    out.push(condition);
                    out.push(output);
                }
                out.push(&*n.otherwise);
            }
            ExprKind::Match(n) => {
                out.push(&*n.input);
                out.extend(n.arms.iter().map(|(_, e)| e));
                out.push(&*n.otherwise);
            }
            ExprKind::Curve(n) => {
                out.push(&*n.input);
                out.extend(n.stops.iter().map(|(_, e)| e));
            }
        }
        out
    }

    /// Visits this node, then every descendant, pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Whether any node satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&Expression) -> bool) -> bool {
        let mut found = false;
        self.walk(&mut |e| found = found || pred(e));
        found
    }

    /// True when the result never depends on the zoom level.
    pub fn is_zoom_constant(&self) -> bool {
        !self.any(|e| matches!(e.kind, ExprKind::Zoom))
    }

    /// True when the result never depends on feature properties.
    pub fn is_feature_constant(&self) -> bool {
        !self.any(|e| match &e.kind {
            ExprKind::Get(_) => true,
            ExprKind::Has(h) => h.object.is_none(),
            _ => false,
        })
    }
}
