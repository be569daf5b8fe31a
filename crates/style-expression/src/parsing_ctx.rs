//! State threaded through recursive parsing.

use crate::error::ParseError;
use crate::expression::Expression;
use crate::types::Type;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// One step of a diagnostic path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Key(String),
    Index(usize),
}

impl From<usize> for PathToken {
    fn from(i: usize) -> Self {
        PathToken::Index(i)
    }
}

impl From<&str> for PathToken {
    fn from(k: &str) -> Self {
        PathToken::Key(k.to_string())
    }
}

impl From<String> for PathToken {
    fn from(k: String) -> Self {
        PathToken::Key(k)
    }
}

/// Location of a node relative to the root of a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(pub Vec<PathToken>);

impl Path {
    fn child(&self, token: PathToken) -> Path {
        let mut tokens = self.0.clone();
        tokens.push(token);
        Path(tokens)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            match token {
                PathToken::Index(n) => write!(f, "[{}]", n)?,
                PathToken::Key(k) if i == 0 => f.write_str(k)?,
                PathToken::Key(k) => write!(f, ".{}", k)?,
            }
        }
        Ok(())
    }
}

/// Named expressions visible at a point in the tree.
///
/// Later entries shadow earlier ones with the same name.
pub type Scope = Vec<(String, Arc<Expression>)>;

/// Context passed to every node parser.
///
/// Derived contexts own their path, expectation and scope, and borrow the
/// error list of the top-level parse.
pub struct ParsingContext<'a> {
    path: Path,
    expected: Option<Type>,
    scope: Scope,
    errors: &'a RefCell<Vec<ParseError>>,
}

impl<'a> ParsingContext<'a> {
    pub fn new(errors: &'a RefCell<Vec<ParseError>>, expected: Option<Type>) -> Self {
        ParsingContext {
            path: Path::default(),
            expected,
            scope: Vec::new(),
            errors,
        }
    }

    /// Starts the path at a named key, e.g. the style property being parsed.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.path = Path(vec![PathToken::Key(key.into())]);
        self
    }

    /// Context for the child at `token`.
    ///
    /// `expected` overrides the current expectation when given, otherwise it
    /// is inherited. `bindings` are appended to the scope.
    pub fn derive(
        &self,
        token: impl Into<PathToken>,
        expected: Option<Type>,
        bindings: &[(String, Arc<Expression>)],
    ) -> ParsingContext<'a> {
        let expected = expected.or_else(|| self.expected.clone());
        self.child(token.into(), expected, bindings)
    }

    /// Like [`derive`](Self::derive), but the child has no expectation.
    pub fn derive_unconstrained(
        &self,
        token: impl Into<PathToken>,
        bindings: &[(String, Arc<Expression>)],
    ) -> ParsingContext<'a> {
        self.child(token.into(), None, bindings)
    }

    fn child(
        &self,
        token: PathToken,
        expected: Option<Type>,
        bindings: &[(String, Arc<Expression>)],
    ) -> ParsingContext<'a> {
        let mut scope = self.scope.clone();
        scope.extend(bindings.iter().cloned());
        ParsingContext {
            path: self.path.child(token),
            expected,
            scope,
            errors: self.errors,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expected_type(&self) -> Option<&Type> {
        self.expected.as_ref()
    }

    /// Innermost binding for `name`.
    pub fn lookup(&self, name: &str) -> Option<&Arc<Expression>> {
        self.scope
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    /// Records an error at this node and returns the failure sentinel.
    pub fn fail<T>(&self, message: impl Into<String>) -> Option<T> {
        self.push_error(self.path.clone(), message.into());
        None
    }

    /// Records an error at the `offset`-th element of this node.
    pub fn fail_at<T>(&self, offset: usize, message: impl Into<String>) -> Option<T> {
        self.push_error(self.path.child(PathToken::Index(offset)), message.into());
        None
    }

    fn push_error(&self, path: Path, message: String) {
        tracing::trace!(path = %path, message = %message, "parse error");
        self.errors.borrow_mut().push(ParseError {
            path: path.to_string(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ExprKind, Expression};
    use crate::value::StyleValue;

    fn literal(n: f64) -> Arc<Expression> {
        Arc::new(Expression {
            path: Path::default(),
            ty: Type::Number,
            kind: ExprKind::Literal(StyleValue::Number(n)),
        })
    }

    #[test]
    fn derived_contexts_share_errors() {
        let errors = RefCell::new(Vec::new());
        let root = ParsingContext::new(&errors, None).with_key("line-width");
        let child = root.derive(2, None, &[]).derive(1, None, &[]);
        assert_eq!(child.fail::<()>("bad"), None);
        let _ = root.fail_at::<()>(3, "worse");
        let errors = errors.into_inner();
        assert_eq!(errors[0].path, "line-width[2][1]");
        assert_eq!(errors[1].path, "line-width[3]");
        assert_eq!(errors[1].message, "worse");
    }

    #[test]
    fn expectation_is_inherited_unless_overridden_or_cleared() {
        let errors = RefCell::new(Vec::new());
        let root = ParsingContext::new(&errors, Some(Type::Number));
        assert_eq!(root.derive(1, None, &[]).expected_type(), Some(&Type::Number));
        assert_eq!(
            root.derive(1, Some(Type::String), &[]).expected_type(),
            Some(&Type::String)
        );
        assert_eq!(root.derive_unconstrained(1, &[]).expected_type(), None);
    }

    #[test]
    fn scope_shadows_and_does_not_leak_to_siblings() {
        let errors = RefCell::new(Vec::new());
        let root = ParsingContext::new(&errors, None);
        let outer = root.derive(1, None, &[("x".to_string(), literal(1.0))]);
        let inner = outer.derive(2, None, &[("x".to_string(), literal(2.0))]);
        let sibling = root.derive(3, None, &[]);
        assert_eq!(
            inner.lookup("x").map(|e| &e.kind),
            Some(&ExprKind::Literal(StyleValue::Number(2.0)))
        );
        assert_eq!(
            outer.lookup("x").map(|e| &e.kind),
            Some(&ExprKind::Literal(StyleValue::Number(1.0)))
        );
        assert!(sibling.lookup("x").is_none());
    }
}
