use crate::value::StyleValue;

/// Evaluation-time variable store for `let` bindings.
///
/// A single stack shared by all nested scopes: a `let` records the current
/// length, pushes its bindings, and truncates back once its body returns.
/// Lookups search from the top, so inner bindings shadow outer ones.
#[derive(Debug, Default)]
pub struct Vars {
    frames: Vec<(String, StyleValue)>,
}

impl Vars {
    pub fn new() -> Self {
        Vars::default()
    }

    /// Returns the innermost value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.frames
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn push(&mut self, name: &str, value: StyleValue) {
        self.frames.push((name.to_string(), value));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drops every binding pushed after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_binding_wins() {
        let mut vars = Vars::new();
        vars.push("x", StyleValue::Number(1.0));
        let mark = vars.len();
        vars.push("x", StyleValue::Number(2.0));
        assert_eq!(vars.get("x"), Some(&StyleValue::Number(2.0)));
        vars.truncate(mark);
        assert_eq!(vars.get("x"), Some(&StyleValue::Number(1.0)));
        assert_eq!(vars.get("y"), None);
    }
}
