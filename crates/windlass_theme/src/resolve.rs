//! Theme resolution: merge, flatten, follow aliases

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Result, ThemeError};
use crate::spec::{ThemeNode, ThemeSpec};
use crate::table::{TokenPath, TokenTable};
use crate::tokens::{base_theme, with_spacing_scales};

/// Merge `extend` onto `base` and resolve the result into a [`TokenTable`].
///
/// The output is a pure function of the two inputs. Fails when the merge
/// hits a table/value conflict or when a `theme(...)` alias cannot be
/// resolved.
pub fn resolve(base: &ThemeSpec, extend: &ThemeSpec) -> Result<TokenTable> {
    let merged = base.merge(extend)?;
    TokenTable::from_spec(&merged)
}

/// Resolve a project theme against the built-in defaults.
///
/// Top-level scopes in `overrides` replace the defaults outright, then
/// `extend` is merged on top. Width and height scales are derived from the
/// final `spacing` scope afterwards, so replacing or extending spacing never
/// leaves them pointing at keys that no longer exist.
pub fn resolve_theme(overrides: &ThemeSpec, extend: &ThemeSpec) -> Result<TokenTable> {
    let merged = base_theme().with_scope_overrides(overrides).merge(extend)?;
    TokenTable::from_spec(&with_spacing_scales(&merged, overrides))
}

impl TokenTable {
    /// Flatten a theme spec into a table, resolving `theme(...)` aliases.
    ///
    /// An alias value names another token by its dotted path, for example
    /// `theme(colors.blue.500)`. Naming a color group resolves to its
    /// `DEFAULT` entry.
    pub fn from_spec(spec: &ThemeSpec) -> Result<TokenTable> {
        let mut raw = BTreeMap::new();
        flatten(spec, &TokenPath::root(), &mut raw)?;

        let mut index: FxHashMap<String, TokenPath> = FxHashMap::default();
        for path in raw.keys() {
            index.entry(path.to_string()).or_insert_with(|| path.clone());
        }

        let mut resolved = BTreeMap::new();
        let mut stack = Vec::new();
        let mut aliases = 0usize;
        for path in raw.keys() {
            if alias_target(&raw[path]).is_some() {
                aliases += 1;
            }
            resolve_entry(path, &raw, &index, &mut resolved, &mut stack)?;
        }

        debug!(tokens = resolved.len(), aliases, "resolved theme tokens");
        Ok(TokenTable::from_entries(resolved))
    }
}

fn flatten(spec: &ThemeSpec, at: &TokenPath, out: &mut BTreeMap<TokenPath, String>) -> Result<()> {
    for (key, node) in spec.iter() {
        let path = at.child(key);
        if key.is_empty() {
            return Err(ThemeError::EmptyKey { path });
        }
        match node {
            ThemeNode::Value(value) => {
                out.insert(path, value.clone());
            }
            ThemeNode::Table(inner) => flatten(inner, &path, out)?,
        }
    }
    Ok(())
}

/// `theme(colors.blue.500)` -> `colors.blue.500`
fn alias_target(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("theme(")?.strip_suffix(')')?.trim();
    let inner = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(inner);
    Some(inner)
}

fn resolve_entry(
    path: &TokenPath,
    raw: &BTreeMap<TokenPath, String>,
    index: &FxHashMap<String, TokenPath>,
    resolved: &mut BTreeMap<TokenPath, String>,
    stack: &mut Vec<TokenPath>,
) -> Result<String> {
    if let Some(done) = resolved.get(path) {
        return Ok(done.clone());
    }

    let value = &raw[path];
    let Some(target) = alias_target(value) else {
        resolved.insert(path.clone(), value.clone());
        return Ok(value.clone());
    };

    if let Some(start) = stack.iter().position(|p| p == path) {
        let mut chain: Vec<String> = stack[start..].iter().map(ToString::to_string).collect();
        chain.push(path.to_string());
        return Err(ThemeError::CircularReference {
            path: path.clone(),
            chain: chain.join(" -> "),
        });
    }

    let target_path = index
        .get(target)
        .or_else(|| index.get(&format!("{target}.DEFAULT")))
        .cloned()
        .ok_or_else(|| ThemeError::UnknownReference {
            path: path.clone(),
            target: target.to_string(),
        })?;

    stack.push(path.clone());
    let value = resolve_entry(&target_path, raw, index, resolved, stack)?;
    stack.pop();

    resolved.insert(path.clone(), value.clone());
    Ok(value)
}
