//! Node definitions and the tag table used by the parser.

pub mod assertion;
pub mod binding;
pub mod branching;
pub mod coalesce;
pub mod curve;
pub mod literal;
pub mod lookup;

use crate::expression::Expression;
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::{unify, Type};
use serde_json::Value;

/// Every expression tag the parser recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Literal,
    Zoom,
    Get,
    Has,
    Var,
    Let,
    Coalesce,
    Error,
    String,
    Number,
    Boolean,
    Object,
    Array,
    ParseColor,
    Not,
    Case,
    Match,
    Curve,
}

impl Operator {
    pub const ALL: [Operator; 18] = [
        Operator::Literal,
        Operator::Zoom,
        Operator::Get,
        Operator::Has,
        Operator::Var,
        Operator::Let,
        Operator::Coalesce,
        Operator::Error,
        Operator::String,
        Operator::Number,
        Operator::Boolean,
        Operator::Object,
        Operator::Array,
        Operator::ParseColor,
        Operator::Not,
        Operator::Case,
        Operator::Match,
        Operator::Curve,
    ];

    pub fn from_tag(tag: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.tag() == tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Operator::Literal => "literal",
            Operator::Zoom => "zoom",
            Operator::Get => "get",
            Operator::Has => "has",
            Operator::Var => "var",
            Operator::Let => "let",
            Operator::Coalesce => "coalesce",
            Operator::Error => "error",
            Operator::String => "string",
            Operator::Number => "number",
            Operator::Boolean => "boolean",
            Operator::Object => "object",
            Operator::Array => "array",
            Operator::ParseColor => "parse-color",
            Operator::Not => "!",
            Operator::Case => "case",
            Operator::Match => "match",
            Operator::Curve => "curve",
        }
    }

    /// Operand count accepted by the operator (tag excluded).
    pub fn arity(self) -> Arity {
        match self {
            Operator::Literal => Arity::Fixed(1),
            Operator::Zoom => Arity::Fixed(0),
            Operator::Get => Arity::Fixed(1),
            Operator::Has => Arity::Range(1, Some(2)),
            Operator::Var => Arity::Fixed(1),
            Operator::Let => Arity::Range(3, None),
            Operator::Coalesce => Arity::Range(1, None),
            Operator::Error => Arity::Fixed(1),
            Operator::String | Operator::Number | Operator::Boolean | Operator::Object => {
                Arity::Range(1, None)
            }
            Operator::Array => Arity::Range(1, Some(3)),
            Operator::ParseColor => Arity::Fixed(1),
            Operator::Not => Arity::Fixed(1),
            Operator::Case => Arity::Range(3, None),
            Operator::Match => Arity::Range(4, None),
            Operator::Curve => Arity::Range(4, None),
        }
    }
}

/// Operator arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` operands.
    Fixed(usize),
    /// Between `min` and `max` operands. `None` for max = unlimited.
    Range(usize, Option<usize>),
}

impl Arity {
    /// Checks the operand count of `expr` (tag included), returning the
    /// diagnostic message on mismatch.
    pub fn check(self, expr_len: usize) -> Result<(), String> {
        let found = expr_len.saturating_sub(1);
        match self {
            Arity::Fixed(n) if found != n => Err(format!(
                "Expected {} argument{}, but found {} instead.",
                n,
                if n == 1 { "" } else { "s" },
                found
            )),
            Arity::Range(min, _) if found < min => Err(format!(
                "Expected at least {} argument{}, but found {} instead.",
                min,
                if min == 1 { "" } else { "s" },
                found
            )),
            Arity::Range(_, Some(max)) if found > max => Err(format!(
                "Expected at most {} arguments, but found {} instead.",
                max, found
            )),
            _ => Ok(()),
        }
    }
}

/// Running output type of a branching node.
///
/// Every branch is unified into it; the first concrete branch type also
/// becomes the expectation for the branches after it.
pub(crate) struct Outputs(pub(crate) Option<Type>);

impl Outputs {
    pub(crate) fn expected(&self) -> Option<Type> {
        self.0.clone().filter(|t| *t != Type::Unknown)
    }

    pub(crate) fn add(&mut self, ctx: &ParsingContext<'_>, index: usize, ty: &Type) -> Option<()> {
        let next = match &self.0 {
            None => ty.clone(),
            Some(current) => match unify(current, ty) {
                Some(t) => t,
                None => {
                    return ctx.fail_at(
                        index,
                        format!("Expected {} but found {} instead.", current, ty),
                    )
                }
            },
        };
        self.0 = Some(next);
        Some(())
    }

    pub(crate) fn parse_branch(
        &mut self,
        raw: &Value,
        index: usize,
        ctx: &ParsingContext<'_>,
    ) -> Option<Expression> {
        let expr = parse(raw, &ctx.derive(index, self.expected(), &[]))?;
        self.add(ctx, index, &expr.ty)?;
        Some(expr)
    }
}
