//! Resolved token table

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Path to a token, one entry per nesting level.
///
/// Displayed dotted (`colors.primary.dark`). Segments are kept separate so a
/// key that itself contains a dot (spacing `0.5`) is never split.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Return a new path with `segment` appended
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment, the theme scope (`colors`, `spacing`, ...)
    pub fn scope(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last segment
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for TokenPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for TokenPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Immutable mapping from token path to final scalar value.
///
/// Produced once by [`crate::resolve`] and then shared by reference with
/// every later stage. No value in the table is an alias.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenTable {
    entries: BTreeMap<TokenPath, String>,
}

impl TokenTable {
    pub(crate) fn from_entries(entries: BTreeMap<TokenPath, String>) -> Self {
        Self { entries }
    }

    /// Look up a value by path segments
    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<&str> {
        let path = TokenPath::new(segments.iter().map(|s| s.as_ref()));
        self.get_path(&path)
    }

    pub fn get_path(&self, path: &TokenPath) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &TokenPath) -> bool {
        self.entries.contains_key(path)
    }

    /// All tokens under a scope, in key order.
    ///
    /// Returned paths are relative to the scope, so `colors.gray.600`
    /// is yielded as `["gray", "600"]`.
    pub fn scope<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = (&'a [String], &'a str)> + 'a {
        self.entries
            .range(TokenPath::new([scope])..)
            .take_while(move |(path, _)| path.scope() == Some(scope))
            .map(|(path, value)| (&path.segments()[1..], value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TokenPath, &str)> {
        self.entries.iter().map(|(path, value)| (path, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
