//! # Path Tracker
//!
//! A pair of independent key sequences, one per operand, used only to
//! label diagnostics. Descending never mutates a path in place; every
//! `descend_*` call returns a fresh [`PathPair`].

use std::fmt;

use serde::Serialize;

/// One step into a schema: a keyword/property name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathKey {
    /// Object member name.
    Name(String),
    /// Array position.
    Index(usize),
}

impl PathKey {
    /// Shorthand for [`PathKey::Name`].
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl From<&str> for PathKey {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<usize> for PathKey {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // RFC 6901 escaping.
            Self::Name(n) => f.write_str(&n.replace('~', "~0").replace('/', "~1")),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Input-side and target-side locations of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PathPair {
    /// Location within the input schema.
    pub input: Vec<PathKey>,
    /// Location within the target schema.
    pub target: Vec<PathKey>,
}

impl PathPair {
    /// Both sides at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend both sides with the same key (property or tuple position).
    pub fn descend_both(&self, key: impl Into<PathKey>) -> Self {
        let key = key.into();
        let mut next = self.clone();
        next.input.push(key.clone());
        next.target.push(key);
        next
    }

    /// Extend the input side only, e.g. `["anyOf", 2]`.
    pub fn descend_input<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        let mut next = self.clone();
        next.input.extend(keys.into_iter().map(Into::into));
        next
    }

    /// Extend the target side only.
    pub fn descend_target<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PathKey>,
    {
        let mut next = self.clone();
        next.target.extend(keys.into_iter().map(Into::into));
        next
    }

    /// Nesting depth, the longer of the two sides.
    pub fn depth(&self) -> usize {
        self.input.len().max(self.target.len())
    }

    /// Input side as a JSON Pointer.
    pub fn input_pointer(&self) -> String {
        pointer(&self.input)
    }

    /// Target side as a JSON Pointer.
    pub fn target_pointer(&self) -> String {
        pointer(&self.target)
    }
}

fn pointer(keys: &[PathKey]) -> String {
    if keys.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for key in keys {
        out.push('/');
        out.push_str(&key.to_string());
    }
    out
}

impl fmt::Display for PathPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input_pointer(), self.target_pointer())
    }
}
