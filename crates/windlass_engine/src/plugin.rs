//! Utility plugins
//!
//! A plugin contributes extra [`UtilityHandler`]s. Plugins are named in the
//! `plugins` list of the configuration and registered once, after the theme
//! is resolved, so handlers can read their scale from the token table.

use windlass_theme::TokenTable;

use crate::error::ConfigError;
use crate::utility::{arbitrary_value, ArbitraryKind, UtilityBody, UtilityHandler, ValueRef};

pub trait UtilityPlugin: Send + Sync {
    /// Identifier used in the `plugins` list
    fn id(&self) -> &str;

    /// Alternate identifiers
    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn register(&self, table: &TokenTable) -> Vec<Box<dyn UtilityHandler>>;
}

/// Known plugins, looked up by identifier
pub struct PluginRegistry {
    plugins: Vec<Box<dyn UtilityPlugin>>,
}

impl PluginRegistry {
    pub fn empty() -> Self {
        Self { plugins: Vec::new() }
    }

    /// The plugins shipped with the engine
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.add(Box::new(AspectRatio));
        registry.add(Box::new(LineClamp));
        registry
    }

    pub fn add(&mut self, plugin: Box<dyn UtilityPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn get(&self, id: &str) -> Option<&dyn UtilityPlugin> {
        self.plugins
            .iter()
            .find(|p| p.id() == id || p.aliases().contains(&id))
            .map(|p| p.as_ref())
    }

    /// Look up each requested identifier, in order
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&dyn UtilityPlugin>, ConfigError> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| {
                self.get(id.as_ref()).ok_or_else(|| ConfigError::UnknownPlugin {
                    index,
                    id: id.as_ref().to_string(),
                })
            })
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `aspect-auto`, `aspect-square`, `aspect-video`, `aspect-[4/3]`
struct AspectRatio;

const ASPECT_RATIO_DEFAULTS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("square", "1 / 1"),
    ("video", "16 / 9"),
];

impl UtilityPlugin for AspectRatio {
    fn id(&self) -> &str {
        "@tailwindcss/aspect-ratio"
    }

    fn aliases(&self) -> &[&str] {
        &["aspect-ratio"]
    }

    fn register(&self, table: &TokenTable) -> Vec<Box<dyn UtilityHandler>> {
        // Theme-defined ratios override the defaults
        let mut ratios: Vec<(String, String)> = ASPECT_RATIO_DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (segments, value) in table.scope("aspectRatio") {
            let key = segments.join("-");
            match ratios.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => ratios.push((key, value.to_string())),
            }
        }
        vec![Box::new(AspectRatioHandler { ratios })]
    }
}

struct AspectRatioHandler {
    ratios: Vec<(String, String)>,
}

impl UtilityHandler for AspectRatioHandler {
    fn matches(&self, utility: &str) -> bool {
        utility.starts_with("aspect-")
    }

    fn build(&self, utility: &str, _table: &TokenTable) -> Option<UtilityBody> {
        let key = utility.strip_prefix("aspect-")?;
        let value = if key.starts_with('[') {
            let ratio = arbitrary_value(key, ArbitraryKind::Length)?;
            if ratio.contains(' ') {
                ValueRef::Arbitrary(ratio)
            } else {
                ValueRef::Arbitrary(ratio.replace('/', " / "))
            }
        } else {
            let (_, ratio) = self.ratios.iter().find(|(k, _)| k == key)?;
            ValueRef::Literal(ratio.clone())
        };
        Some(UtilityBody::new("aspect", value, ["aspect-ratio"]))
    }
}

/// `line-clamp-3`, `line-clamp-none`
struct LineClamp;

impl UtilityPlugin for LineClamp {
    fn id(&self) -> &str {
        "@tailwindcss/line-clamp"
    }

    fn aliases(&self) -> &[&str] {
        &["line-clamp"]
    }

    fn register(&self, _table: &TokenTable) -> Vec<Box<dyn UtilityHandler>> {
        vec![Box::new(LineClampHandler)]
    }
}

struct LineClampHandler;

impl LineClampHandler {
    fn lines(key: &str) -> Option<ValueRef> {
        if key.starts_with('[') {
            return arbitrary_value(key, ArbitraryKind::Length).map(ValueRef::Arbitrary);
        }
        let n: u32 = key.parse().ok()?;
        (n > 0).then(|| ValueRef::Literal(n.to_string()))
    }
}

impl UtilityHandler for LineClampHandler {
    fn matches(&self, utility: &str) -> bool {
        utility.starts_with("line-clamp-")
    }

    fn build(&self, utility: &str, _table: &TokenTable) -> Option<UtilityBody> {
        let key = utility.strip_prefix("line-clamp-")?;
        if key == "none" {
            let body = UtilityBody::new("line-clamp", ValueRef::Literal("unset".into()), ["-webkit-line-clamp"])
                .with_fixed("overflow", "visible")
                .with_fixed("display", "block")
                .with_fixed("-webkit-box-orient", "horizontal");
            return Some(body);
        }
        let body = UtilityBody::new("line-clamp", Self::lines(key)?, ["-webkit-line-clamp"])
            .with_fixed("overflow", "hidden")
            .with_fixed("display", "-webkit-box")
            .with_fixed("-webkit-box-orient", "vertical");
        Some(body)
    }
}
