//! Typed expressions for data-driven map styling.
//!
//! # Overview
//!
//! Style properties are written as JSON arrays of the form
//! `[tag, ...arguments]`. This crate parses them into a typed tree, checks
//! the types against what the property expects, compiles the tree for
//! repeated evaluation and serializes it back to JSON. Legacy stops-based
//! function objects are converted to the same array form first.
//!
//! # Example
//!
//! ```
//! use style_expression::{compile, parse_expression, ParseOptions, StyleValue, Type};
//! use serde_json::json;
//!
//! let raw = json!(["coalesce", ["number", ["get", "width"]], 1]);
//! let expr = parse_expression(&raw, &ParseOptions::expecting(Type::Number)).unwrap();
//! assert_eq!(expr.serialize(), raw);
//!
//! let compiled = compile(expr);
//! let feature = json!({"width": 4});
//! let props = feature.as_object().unwrap();
//! assert_eq!(compiled.evaluate(None, Some(props)), Ok(StyleValue::Number(4.0)));
//! assert_eq!(compiled.evaluate(None, None), Ok(StyleValue::Number(1.0)));
//! ```

pub mod codegen;
pub mod color;
pub mod convert;
pub mod definitions;
pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod expression;
pub mod parse;
pub mod parsing_ctx;
pub mod property_expression;
pub mod property_spec;
pub mod types;
pub mod value;
pub mod vars;

// Re-export the core public API
pub use codegen::{compile, CompiledExpression};
pub use color::Color;
pub use convert::{convert_function, convert_value};
pub use error::{ConvertError, EvalError, ParseError, StyleExpressionError};
pub use eval_ctx::{EvalCtx, Feature};
pub use evaluate::evaluate;
pub use expression::{ExprKind, Expression};
pub use parse::{parse_expression, ParseOptions};
pub use parsing_ctx::{ParsingContext, Path, PathToken};
pub use property_expression::PropertyExpression;
pub use property_spec::{PropertySpec, StopFunction};
pub use types::{unify, Type};
pub use value::StyleValue;
pub use vars::Vars;
