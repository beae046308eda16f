//! Raw theme input and deep merging

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, ThemeError};
use crate::table::TokenPath;

/// One node of a theme: a scalar value or a nested table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ThemeNode {
    Value(String),
    Table(ThemeSpec),
}

impl ThemeNode {
    fn kind(&self) -> &'static str {
        match self {
            ThemeNode::Value(_) => "value",
            ThemeNode::Table(_) => "table",
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            ThemeNode::Value(value) => Some(value),
            ThemeNode::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&ThemeSpec> {
        match self {
            ThemeNode::Value(_) => None,
            ThemeNode::Table(table) => Some(table),
        }
    }
}

impl From<&str> for ThemeNode {
    fn from(value: &str) -> Self {
        ThemeNode::Value(value.to_string())
    }
}

impl From<String> for ThemeNode {
    fn from(value: String) -> Self {
        ThemeNode::Value(value)
    }
}

impl From<ThemeSpec> for ThemeNode {
    fn from(table: ThemeSpec) -> Self {
        ThemeNode::Table(table)
    }
}

/// Config files write numbers and booleans unquoted (`fontWeight.bold = 700`).
/// They are accepted and kept as their textual form.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNode {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Table(BTreeMap<String, RawNode>),
}

impl<'de> Deserialize<'de> for ThemeNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawNode::deserialize(deserializer).map(Into::into)
    }
}

impl From<RawNode> for ThemeNode {
    fn from(raw: RawNode) -> Self {
        match raw {
            RawNode::Str(s) => ThemeNode::Value(s),
            RawNode::Int(i) => ThemeNode::Value(i.to_string()),
            RawNode::Float(f) => ThemeNode::Value(f.to_string()),
            RawNode::Bool(b) => ThemeNode::Value(b.to_string()),
            RawNode::Table(map) => ThemeNode::Table(ThemeSpec {
                entries: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            }),
        }
    }
}

/// Nested theme table, as written in configuration.
///
/// Both the built-in defaults and a user's `theme.extend` block are
/// `ThemeSpec`s. Keys are kept sorted so every traversal is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeSpec {
    entries: BTreeMap<String, ThemeNode>,
}

impl ThemeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(key, node)` pairs
    pub fn from_pairs<I, K, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, N)>,
        K: Into<String>,
        N: Into<ThemeNode>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&ThemeNode> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<ThemeNode>) -> Option<ThemeNode> {
        self.entries.insert(key.into(), node.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a leaf value, creating intermediate tables as needed.
    ///
    /// Fails with [`ThemeError::TypeConflict`] when an intermediate segment
    /// already holds a value.
    pub fn set(&mut self, path: &[&str], value: impl Into<String>) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            return Err(ThemeError::EmptyKey {
                path: TokenPath::root(),
            });
        };

        let mut table = self;
        let mut walked = TokenPath::root();
        for segment in parents {
            walked = walked.child(*segment);
            let node = table
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| ThemeNode::Table(ThemeSpec::new()));
            table = match node {
                ThemeNode::Table(inner) => inner,
                ThemeNode::Value(_) => {
                    return Err(ThemeError::TypeConflict {
                        path: walked,
                        base: "value",
                        extend: "table",
                    })
                }
            };
        }
        table.entries.insert(last.to_string(), ThemeNode::Value(value.into()));
        Ok(())
    }

    /// Deep-merge `extend` onto `self`.
    ///
    /// Tables on both sides merge recursively, values in `extend` replace
    /// values in `self`, and entries present on one side only are kept. A
    /// value on one side meeting a table on the other is a
    /// [`ThemeError::TypeConflict`].
    pub fn merge(&self, extend: &ThemeSpec) -> Result<ThemeSpec> {
        merge_tables(self, extend, &TokenPath::root())
    }

    /// Replace whole top-level scopes.
    ///
    /// Mirrors a config's `theme.<scope>` entries written outside `extend`:
    /// the scope's defaults are dropped, not merged.
    pub fn with_scope_overrides(&self, overrides: &ThemeSpec) -> ThemeSpec {
        let mut out = self.clone();
        for (scope, node) in overrides.iter() {
            out.entries.insert(scope.to_string(), node.clone());
        }
        out
    }
}

impl From<BTreeMap<String, ThemeNode>> for ThemeSpec {
    fn from(entries: BTreeMap<String, ThemeNode>) -> Self {
        Self { entries }
    }
}

fn merge_tables(base: &ThemeSpec, extend: &ThemeSpec, at: &TokenPath) -> Result<ThemeSpec> {
    let mut out = base.clone();
    for (key, incoming) in &extend.entries {
        let path = at.child(key.as_str());
        if key.is_empty() {
            return Err(ThemeError::EmptyKey { path });
        }
        let merged = match (base.entries.get(key), incoming) {
            (None, node) => node.clone(),
            (Some(ThemeNode::Table(b)), ThemeNode::Table(e)) => {
                ThemeNode::Table(merge_tables(b, e, &path)?)
            }
            (Some(ThemeNode::Value(_)), ThemeNode::Value(v)) => ThemeNode::Value(v.clone()),
            (Some(existing), node) => {
                return Err(ThemeError::TypeConflict {
                    path,
                    base: existing.kind(),
                    extend: node.kind(),
                })
            }
        };
        out.entries.insert(key.clone(), merged);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn primary(pairs: &[(&str, &str)]) -> ThemeSpec {
        let mut spec = ThemeSpec::new();
        for (shade, value) in pairs {
            spec.set(&["colors", "primary", *shade], *value).unwrap();
        }
        spec
    }

    #[test]
    fn merge_with_empty_extend_is_identity() {
        let base = primary(&[("DEFAULT", "#3b82f6"), ("light", "#60a5fa")]);
        assert_eq!(base.merge(&ThemeSpec::new()).unwrap(), base);
    }

    #[test]
    fn merge_keeps_untouched_branches() {
        let mut base = primary(&[("DEFAULT", "#3b82f6")]);
        base.set(&["spacing", "4"], "1rem").unwrap();
        let extend = primary(&[("dark", "#2563eb")]);

        let merged = base.merge(&extend).unwrap();
        let mut expected = primary(&[("DEFAULT", "#3b82f6"), ("dark", "#2563eb")]);
        expected.set(&["spacing", "4"], "1rem").unwrap();
        assert_eq!(merged, expected);
    }

    #[test]
    fn extend_wins_on_conflicting_values() {
        let base = primary(&[("DEFAULT", "#3b82f6")]);
        let extend = primary(&[("DEFAULT", "#000000")]);
        assert_eq!(base.merge(&extend).unwrap(), extend);
    }

    #[test]
    fn value_over_table_is_a_conflict() {
        let base = primary(&[("DEFAULT", "#3b82f6")]);
        let mut extend = ThemeSpec::new();
        extend.set(&["colors", "primary"], "#ff0000").unwrap();

        let err = base.merge(&extend).unwrap_err();
        assert_eq!(
            err,
            ThemeError::TypeConflict {
                path: TokenPath::new(["colors", "primary"]),
                base: "table",
                extend: "value",
            }
        );
        assert_eq!(
            err.to_string(),
            "type conflict at `theme.colors.primary`: base defines a table, extend defines a value"
        );
    }

    #[test]
    fn table_over_value_is_a_conflict() {
        let mut base = ThemeSpec::new();
        base.set(&["colors", "white"], "#ffffff").unwrap();
        let mut extend = ThemeSpec::new();
        extend.set(&["colors", "white", "dark"], "#eeeeee").unwrap();

        assert!(matches!(
            base.merge(&extend),
            Err(ThemeError::TypeConflict { base: "value", extend: "table", .. })
        ));
    }

    #[test]
    fn scope_overrides_replace_wholesale() {
        let mut base = primary(&[("DEFAULT", "#3b82f6")]);
        base.set(&["spacing", "4"], "1rem").unwrap();
        let mut overrides = ThemeSpec::new();
        overrides.set(&["colors", "brand"], "#123456").unwrap();

        let out = base.with_scope_overrides(&overrides);
        let colors = out.get("colors").and_then(ThemeNode::as_table).unwrap();
        assert!(colors.get("primary").is_none());
        assert!(colors.get("brand").is_some());
        assert!(out.get("spacing").is_some());
    }

    #[test]
    fn deserializes_numbers_as_values() {
        let spec: ThemeSpec = serde_json::from_str(
            r#"{ "fontWeight": { "bold": 700 }, "lineHeight": { "snug": 1.375 } }"#,
        )
        .unwrap();
        let weight = spec.get("fontWeight").and_then(ThemeNode::as_table).unwrap();
        assert_eq!(weight.get("bold").and_then(ThemeNode::as_value), Some("700"));
        let line = spec.get("lineHeight").and_then(ThemeNode::as_table).unwrap();
        assert_eq!(line.get("snug").and_then(ThemeNode::as_value), Some("1.375"));
    }
}
