//! `["curve", interpolation, input, stop, output, ...]`: piecewise functions
//! of a numeric input (usually `["zoom"]` or a feature property).

use crate::definitions::Outputs;
use crate::error::EvalError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::expression::{ExprKind, Expression};
use crate::parse::parse;
use crate::parsing_ctx::ParsingContext;
use crate::types::Type;
use crate::value::{number_to_json, StyleValue};
use serde_json::{json, Value};

/// How a curve moves between stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolation {
    /// Output of the largest stop not above the input.
    Step,
    Linear,
    /// Exponential easing with the given base; `1` is linear.
    Exponential(f64),
}

impl Interpolation {
    fn parse(raw: &Value) -> Option<Interpolation> {
        let items = raw.as_array()?;
        match (items.first()?.as_str()?, items.len()) {
            ("step", 1) => Some(Interpolation::Step),
            ("linear", 1) => Some(Interpolation::Linear),
            ("exponential", 2) => items[1].as_f64().map(Interpolation::Exponential),
            _ => None,
        }
    }

    fn serialize(&self) -> Value {
        match self {
            Interpolation::Step => json!(["step"]),
            Interpolation::Linear => json!(["linear"]),
            Interpolation::Exponential(base) => json!(["exponential", number_to_json(*base)]),
        }
    }

    /// Fraction of the way from `lower` to `upper` that `input` lies.
    pub fn factor(&self, input: f64, lower: f64, upper: f64) -> f64 {
        let difference = upper - lower;
        let progress = input - lower;
        if difference == 0.0 {
            return 0.0;
        }
        match self {
            Interpolation::Exponential(base) if *base != 1.0 => {
                (base.powf(progress) - 1.0) / (base.powf(difference) - 1.0)
            }
            _ => progress / difference,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub interpolation: Interpolation,
    pub input: Box<Expression>,
    /// Breakpoints in strictly ascending order.
    pub stops: Vec<(f64, Expression)>,
}

impl Curve {
    pub(crate) fn parse(args: &[Value], ctx: &ParsingContext<'_>) -> Option<Expression> {
        if (args.len() - 3) % 2 != 0 {
            return ctx.fail("Expected an even number of arguments.");
        }
        let Some(interpolation) = Interpolation::parse(&args[1]) else {
            return ctx.fail_at(
                1,
                r#"Unknown interpolation type. Use ["step"], ["linear"] or ["exponential", base]."#,
            );
        };

        if let Interpolation::Exponential(base) = interpolation {
            if !base.is_finite() || base <= 0.0 {
                return ctx.fail_at(
                    1,
                    format!("Exponential interpolation requires a positive base, but found {}.", base),
                );
            }
        }

        let input = parse(&args[2], &ctx.derive(2, Some(Type::Number), &[]));
        let mut outputs = Outputs(None);
        let mut stops: Vec<(f64, Expression)> = Vec::new();
        let mut failed = false;
        for i in (3..args.len()).step_by(2) {
            let Some(label) = args[i].as_f64() else {
                return ctx.fail_at(
                    i,
                    r#"Input/output pairs for "curve" expressions must be defined using literal numeric values (not computed expressions) for the input values."#,
                );
            };
            if let Some((previous, _)) = stops.last() {
                if *previous >= label {
                    return ctx.fail_at(
                        i,
                        r#"Input/output pairs for "curve" expressions must be arranged with input values in strictly ascending order."#,
                    );
                }
            }
            match outputs.parse_branch(&args[i + 1], i + 1, ctx) {
                Some(output) => stops.push((label, output)),
                None => failed = true,
            }
        }
        if failed {
            return None;
        }
        let input = input?;
        let ty = outputs.0.unwrap_or(Type::Unknown);
        if interpolation != Interpolation::Step && !ty.is_interpolatable() {
            return ctx.fail(format!("Type {} is not interpolatable.", ty));
        }

        Some(Expression::new(
            ctx.path(),
            ty,
            ExprKind::Curve(Curve {
                interpolation,
                input: Box::new(input),
                stops,
            }),
        ))
    }

    pub(crate) fn evaluate(&self, ctx: &mut EvalCtx<'_>) -> Result<StyleValue, EvalError> {
        let input = match evaluate(&self.input, ctx)? {
            StyleValue::Number(n) => n,
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: Type::Number,
                    found: other.type_of(),
                })
            }
        };

        if input.is_nan() {
            return Err(EvalError::NanCurveInput);
        }

        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if input <= first.0 {
            return evaluate(&first.1, ctx);
        }
        if input >= last.0 {
            return evaluate(&last.1, ctx);
        }

        // first.0 < input < last.0 and input is not NaN, so 1 <= upper < len.
        let upper = self.stops.partition_point(|(stop, _)| *stop <= input);
        let (lower_stop, lower_output) = &self.stops[upper - 1];
        if self.interpolation == Interpolation::Step {
            return evaluate(lower_output, ctx);
        }
        let (upper_stop, upper_output) = &self.stops[upper];
        let t = self.interpolation.factor(input, *lower_stop, *upper_stop);
        let from = evaluate(lower_output, ctx)?;
        let to = evaluate(upper_output, ctx)?;
        interpolate(&from, &to, t)
    }

    pub(crate) fn serialize(&self) -> Value {
        let mut out = vec![
            json!("curve"),
            self.interpolation.serialize(),
            self.input.serialize(),
        ];
        for (stop, output) in &self.stops {
            out.push(number_to_json(*stop));
            out.push(output.serialize());
        }
        Value::Array(out)
    }
}

/// Blends two values of the same interpolatable shape.
pub fn interpolate(from: &StyleValue, to: &StyleValue, t: f64) -> Result<StyleValue, EvalError> {
    match (from, to) {
        (StyleValue::Number(a), StyleValue::Number(b)) => Ok(StyleValue::Number(a + (b - a) * t)),
        (StyleValue::Color(a), StyleValue::Color(b)) => Ok(StyleValue::Color(a.lerp(b, t))),
        (StyleValue::Array(a), StyleValue::Array(b)) if a.len() == b.len() => a
            .iter()
            .zip(b)
            .map(|(x, y)| interpolate(x, y, t))
            .collect::<Result<Vec<_>, _>>()
            .map(StyleValue::Array),
        _ => Err(EvalError::TypeMismatch {
            expected: from.type_of(),
            found: to.type_of(),
        }),
    }
}
