use crate::types::Type;
use thiserror::Error;

/// A user-data problem found while parsing an expression.
///
/// `path` is the rendered location of the offending node, e.g. `[1][2]` or
/// `fill-color[2]` when a root key was given.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {message}")]
pub struct ParseError {
    pub path: String,
    pub message: String,
}

/// Failure produced while evaluating a compiled expression against a feature.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expected value to be of type {expected}, but found {found} instead.")]
    TypeMismatch { expected: Type, found: Type },

    #[error("Property \"{0}\" not found.")]
    MissingProperty(String),

    #[error("The \"zoom\" expression requires a zoom level.")]
    MissingZoom,

    #[error("Unknown variable \"{0}\".")]
    UnboundVariable(String),

    #[error("Could not parse color from value '{0}'.")]
    InvalidColor(String),

    #[error("Curve input is not a number.")]
    NanCurveInput,

    #[error("{0}")]
    Thrown(String),
}

/// Schema-level failure raised by the legacy function converter.
///
/// These are never batched: they mean the embedding system handed over a
/// property specification or function object the converter cannot honour.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Unimplemented color space \"{0}\".")]
    UnsupportedColorSpace(String),

    #[error("Unknown zoom function type \"{0}\".")]
    UnknownZoomFunctionType(String),

    #[error("Unknown property function type \"{0}\".")]
    UnknownPropertyFunctionType(String),

    #[error("Unsupported stop input type \"{0}\".")]
    UnsupportedStopInput(&'static str),

    #[error("Boolean categorical functions take one or two stops, found {0}.")]
    TooManyBooleanStops(usize),

    #[error("Invalid function definition: {0}")]
    InvalidDefinition(String),
}

/// Error returned by the end-to-end property expression constructor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleExpressionError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("{}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
