//! Rule generation: descriptors to concrete CSS rules

use std::fmt::{self, Display, Formatter};

use rustc_hash::FxHashSet;
use tracing::debug;
use windlass_theme::TokenTable;

use crate::interpreter::UtilityDescriptor;
use crate::variant::{DarkMode, Variant};

/// Ancestor selector that activates `dark:` rules under [`DarkMode::Class`]
pub const DARK_CLASS_SELECTOR: &str = ".dark";

/// Media query used for `dark:` under [`DarkMode::Media`]
pub const DARK_MEDIA_QUERY: &str = "@media (prefers-color-scheme: dark)";

/// Output layer. Later layers win the cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Utilities,
    /// Pseudo-class and dark variants
    Variants,
    /// Responsive variants, ordered by breakpoint width
    Responsive { min_width_px: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratedRule {
    pub selector: String,
    /// At-rules enclosing the rule, outermost first
    pub wrappers: Vec<String>,
    pub declarations: Vec<Declaration>,
    pub layer: Layer,
    /// Class token the rule was generated from
    pub origin: String,
}

impl GeneratedRule {
    /// Identity used for deduplication
    pub fn key(&self) -> (&[String], &str) {
        (&self.wrappers, &self.selector)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub dark_mode: DarkMode,
}

/// Escape a class token for use in a selector
pub fn escape_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 8);
    for (i, c) in class.chars().enumerate() {
        let leading_digit = c.is_ascii_digit()
            && (i == 0 || (i == 1 && class.starts_with('-')));
        if leading_digit {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Negate a CSS value: `1rem` -> `-1rem`, `theme-ish` -> `calc(... * -1)`
pub fn negate(value: &str) -> String {
    if value == "0" {
        return value.to_string();
    }
    if let Some(positive) = value.strip_prefix('-') {
        return positive.to_string();
    }
    if value.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        format!("-{value}")
    } else {
        format!("calc({value} * -1)")
    }
}

/// Parse a breakpoint into whole pixels for ordering. `em`/`rem` count as
/// 16px; anything unparseable sorts last.
fn breakpoint_px(width: &str) -> u32 {
    let width = width.trim();
    let (number, scale) = if let Some(n) = width.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = width.strip_suffix("rem").or_else(|| width.strip_suffix("em")) {
        (n, 16.0)
    } else {
        (width, 1.0)
    };
    match number.trim().parse::<f64>() {
        Ok(n) if n >= 0.0 => (n * scale).round() as u32,
        _ => u32::MAX,
    }
}

/// Build the rule for a single descriptor. `None` if its value no longer
/// resolves against `table`.
pub fn generate_rule(
    descriptor: &UtilityDescriptor,
    table: &TokenTable,
    options: &GeneratorOptions,
) -> Option<GeneratedRule> {
    let value = descriptor.value.resolve(table)?;
    let value = if descriptor.negative {
        negate(value)
    } else {
        value.to_string()
    };

    let mut selector = format!(".{}", escape_class(&descriptor.class));
    let mut dark_ancestor = false;
    let mut wrappers = Vec::new();
    let mut layer = Layer::Utilities;

    for variant in &descriptor.variants {
        match variant {
            Variant::Pseudo(pseudo) => {
                selector.push_str(pseudo.selector());
                layer = layer.max(Layer::Variants);
            }
            Variant::Dark => {
                match options.dark_mode {
                    DarkMode::Class => dark_ancestor = true,
                    DarkMode::Media => wrappers.push(DARK_MEDIA_QUERY.to_string()),
                }
                layer = layer.max(Layer::Variants);
            }
            Variant::Screen { min_width, .. } => {
                wrappers.push(format!("@media (min-width: {min_width})"));
                layer = layer.max(Layer::Responsive {
                    min_width_px: breakpoint_px(min_width),
                });
            }
        }
    }
    if dark_ancestor {
        selector = format!("{DARK_CLASS_SELECTOR} {selector}");
    }

    let important = descriptor.important;
    let declarations = descriptor
        .fixed
        .iter()
        .map(|(property, value)| (property.as_str(), value.clone()))
        .chain(descriptor.targets.iter().map(|t| (t.as_str(), value.clone())))
        .map(|(property, value)| Declaration {
            property: property.to_string(),
            value,
            important,
        })
        .collect();

    Some(GeneratedRule {
        selector,
        wrappers,
        declarations,
        layer,
        origin: descriptor.class.clone(),
    })
}

/// Generate rules in descriptor order, keeping the first rule for each
/// `(wrappers, selector)` pair.
pub fn generate<'d, I>(descriptors: I, table: &TokenTable, options: &GeneratorOptions) -> Vec<GeneratedRule>
where
    I: IntoIterator<Item = &'d UtilityDescriptor>,
{
    dedup_rules(descriptors.into_iter().filter_map(|descriptor| {
        let rule = generate_rule(descriptor, table, options);
        if rule.is_none() {
            debug!(class = %descriptor.class, "descriptor no longer resolves");
        }
        rule
    }))
}

/// Keep the first rule for each `(wrappers, selector)` pair
pub fn dedup_rules<I: IntoIterator<Item = GeneratedRule>>(rules: I) -> Vec<GeneratedRule> {
    let mut seen: FxHashSet<(Vec<String>, String)> = FxHashSet::default();
    let mut out = Vec::new();
    for rule in rules {
        if seen.insert((rule.wrappers.clone(), rule.selector.clone())) {
            out.push(rule);
        }
    }
    out
}
