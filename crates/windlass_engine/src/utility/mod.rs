//! Utility handlers
//!
//! A handler recognises one family of utility names (`bg-*`, `flex`,
//! `line-clamp-*`) and turns a match into a [`UtilityBody`]. Built-in
//! handlers come first in the [`HandlerRegistry`]; plugin handlers are
//! appended after them in registration order.

mod builtin;

use windlass_theme::{TokenPath, TokenTable};

pub(crate) use builtin::builtin_handlers;

/// Longest hyphenated key tried against a theme scope
const MAX_KEY_PARTS: usize = 6;

/// Where a utility's value comes from
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueRef {
    /// A path into the token table
    Token(TokenPath),
    /// `[...]` syntax, passed through unresolved
    Arbitrary(String),
    /// A fixed keyword value (`flex` -> `display: flex`)
    Literal(String),
}

impl ValueRef {
    /// The CSS value text, or `None` if a token path is missing from `table`
    pub fn resolve<'a>(&'a self, table: &'a TokenTable) -> Option<&'a str> {
        match self {
            ValueRef::Token(path) => table.get_path(path),
            ValueRef::Arbitrary(value) | ValueRef::Literal(value) => Some(value),
        }
    }
}

/// What a handler produces for one utility name
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UtilityBody {
    /// Utility key, e.g. `bg` for `bg-primary`
    pub property: String,
    pub value: ValueRef,
    /// CSS properties that receive `value`
    pub targets: Vec<String>,
    /// Constant declarations emitted before the targets
    pub fixed: Vec<(String, String)>,
    /// Leading `-`: the value is negated
    pub negative: bool,
}

impl UtilityBody {
    pub fn new<I, S>(property: impl Into<String>, value: ValueRef, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            property: property.into(),
            value,
            targets: targets.into_iter().map(Into::into).collect(),
            fixed: Vec::new(),
            negative: false,
        }
    }

    pub fn with_fixed(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed.push((property.into(), value.into()));
        self
    }
}

/// Extension point for utility families.
///
/// `matches` is a cheap name test; `build` may still decline (return
/// `None`) when the value part does not resolve, in which case the next
/// handler is consulted.
pub trait UtilityHandler: Send + Sync {
    fn matches(&self, utility: &str) -> bool;

    fn build(&self, utility: &str, table: &TokenTable) -> Option<UtilityBody>;
}

/// Ordered handler list: built-ins first, then plugins
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn UtilityHandler>>,
}

impl HandlerRegistry {
    /// Registry holding only the built-in utilities
    pub fn builtin() -> Self {
        Self {
            handlers: builtin_handlers(),
        }
    }

    /// Registry with no handlers at all
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn push(&mut self, handler: Box<dyn UtilityHandler>) {
        self.handlers.push(handler);
    }

    pub fn extend<I: IntoIterator<Item = Box<dyn UtilityHandler>>>(&mut self, handlers: I) {
        self.handlers.extend(handlers);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Whether any handler claims the name, resolvable or not
    pub fn matches(&self, utility: &str) -> bool {
        self.handlers.iter().any(|h| h.matches(utility))
    }

    /// First body built by a matching handler
    pub fn build(&self, utility: &str, table: &TokenTable) -> Option<UtilityBody> {
        self.handlers
            .iter()
            .filter(|h| h.matches(utility))
            .find_map(|h| h.build(utility, table))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Which arbitrary values a handler accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArbitraryKind {
    Any,
    Color,
    Length,
    Never,
}

impl ArbitraryKind {
    fn accepts(self, value: &str) -> bool {
        match self {
            ArbitraryKind::Any => true,
            ArbitraryKind::Color => looks_like_color(value),
            ArbitraryKind::Length => !looks_like_color(value),
            ArbitraryKind::Never => false,
        }
    }
}

fn looks_like_color(value: &str) -> bool {
    value.starts_with('#')
        || ["rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "oklch(", "color("]
            .iter()
            .any(|f| value.starts_with(f))
        || matches!(value, "transparent" | "currentColor")
}

/// Parse `[...]` into its value. Underscores stand for spaces.
pub fn arbitrary_value(key: &str, kind: ArbitraryKind) -> Option<String> {
    let inner = key.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains('[') || inner.contains(']') {
        return None;
    }
    let value = inner.replace('_', " ");
    kind.accepts(&value).then_some(value)
}

/// Find the token a hyphenated key refers to inside `scope`.
///
/// `primary-dark` in `colors` tries `colors.primary-dark`, then
/// `colors.primary.dark`; each candidate also tries a trailing `DEFAULT`.
/// Fewer, longer keys are preferred, so lookup is deterministic. An empty
/// key names the scope's `DEFAULT`.
pub fn lookup_scope(table: &TokenTable, scope: &str, key: &str) -> Option<TokenPath> {
    if key.is_empty() {
        let path = TokenPath::new([scope, "DEFAULT"]);
        return table.contains(&path).then_some(path);
    }

    let parts: Vec<&str> = key.split('-').collect();
    if parts.len() > MAX_KEY_PARTS || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    for groups in 1..=parts.len() {
        for cuts in cut_positions(parts.len(), groups) {
            let mut path = TokenPath::new([scope]);
            let mut start = 0;
            for end in cuts.iter().copied().chain(std::iter::once(parts.len())) {
                path = path.child(parts[start..end].join("-"));
                start = end;
            }
            if table.contains(&path) {
                return Some(path);
            }
            let default = path.child("DEFAULT");
            if table.contains(&default) {
                return Some(default);
            }
        }
    }
    None
}

/// Every way to place `groups - 1` cuts between `len` parts, in
/// lexicographic order.
fn cut_positions(len: usize, groups: usize) -> Vec<Vec<usize>> {
    fn walk(from: usize, len: usize, left: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if left == 0 {
            out.push(current.clone());
            return;
        }
        for cut in from..len {
            current.push(cut);
            walk(cut + 1, len, left - 1, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    walk(1, len, groups - 1, &mut Vec::new(), &mut out);
    out
}
