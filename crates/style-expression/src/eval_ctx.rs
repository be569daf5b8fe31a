use crate::vars::Vars;
use serde_json::{Map, Value};

/// Source of feature properties for `get` and `has`.
///
/// Implemented for plain JSON objects; renderers can implement it over their
/// own feature storage.
pub trait Feature {
    fn property(&self, name: &str) -> Option<&Value>;
}

impl Feature for Map<String, Value> {
    fn property(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// The execution context passed to every node evaluator.
pub struct EvalCtx<'a> {
    /// Current zoom level, if the caller is rendering at one.
    pub zoom: Option<f64>,
    /// The feature being styled.
    pub feature: Option<&'a dyn Feature>,
    /// Values bound by enclosing `let` expressions.
    pub vars: Vars,
}

impl<'a> EvalCtx<'a> {
    pub fn new(zoom: Option<f64>, feature: Option<&'a dyn Feature>) -> Self {
        EvalCtx {
            zoom,
            feature,
            vars: Vars::new(),
        }
    }
}
