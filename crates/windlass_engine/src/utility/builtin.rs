//! Built-in utility families

use rustc_hash::FxHashMap;
use windlass_theme::TokenTable;

use super::{arbitrary_value, lookup_scope, ArbitraryKind, UtilityBody, UtilityHandler, ValueRef};

type Declarations = &'static [(&'static str, &'static str)];

/// Utilities with no value part. The last declaration is the target, the
/// rest are fixed.
const KEYWORDS: &[(&str, Declarations)] = &[
    // Display
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("flex", &[("display", "flex")]),
    ("inline-flex", &[("display", "inline-flex")]),
    ("grid", &[("display", "grid")]),
    ("inline-grid", &[("display", "inline-grid")]),
    ("table", &[("display", "table")]),
    ("contents", &[("display", "contents")]),
    ("hidden", &[("display", "none")]),
    // Position
    ("static", &[("position", "static")]),
    ("fixed", &[("position", "fixed")]),
    ("absolute", &[("position", "absolute")]),
    ("relative", &[("position", "relative")]),
    ("sticky", &[("position", "sticky")]),
    // Flexbox
    ("flex-row", &[("flex-direction", "row")]),
    ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
    ("flex-col", &[("flex-direction", "column")]),
    ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
    ("flex-wrap", &[("flex-wrap", "wrap")]),
    ("flex-wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
    ("flex-nowrap", &[("flex-wrap", "nowrap")]),
    ("flex-1", &[("flex", "1 1 0%")]),
    ("flex-auto", &[("flex", "1 1 auto")]),
    ("flex-initial", &[("flex", "0 1 auto")]),
    ("flex-none", &[("flex", "none")]),
    ("grow", &[("flex-grow", "1")]),
    ("grow-0", &[("flex-grow", "0")]),
    ("shrink", &[("flex-shrink", "1")]),
    ("shrink-0", &[("flex-shrink", "0")]),
    ("items-start", &[("align-items", "flex-start")]),
    ("items-end", &[("align-items", "flex-end")]),
    ("items-center", &[("align-items", "center")]),
    ("items-baseline", &[("align-items", "baseline")]),
    ("items-stretch", &[("align-items", "stretch")]),
    ("justify-start", &[("justify-content", "flex-start")]),
    ("justify-end", &[("justify-content", "flex-end")]),
    ("justify-center", &[("justify-content", "center")]),
    ("justify-between", &[("justify-content", "space-between")]),
    ("justify-around", &[("justify-content", "space-around")]),
    ("justify-evenly", &[("justify-content", "space-evenly")]),
    ("self-auto", &[("align-self", "auto")]),
    ("self-start", &[("align-self", "flex-start")]),
    ("self-end", &[("align-self", "flex-end")]),
    ("self-center", &[("align-self", "center")]),
    ("self-stretch", &[("align-self", "stretch")]),
    // Typography
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("text-justify", &[("text-align", "justify")]),
    ("italic", &[("font-style", "italic")]),
    ("not-italic", &[("font-style", "normal")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("line-through", &[("text-decoration-line", "line-through")]),
    ("no-underline", &[("text-decoration-line", "none")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("normal-case", &[("text-transform", "none")]),
    ("whitespace-normal", &[("white-space", "normal")]),
    ("whitespace-nowrap", &[("white-space", "nowrap")]),
    ("whitespace-pre", &[("white-space", "pre")]),
    (
        "truncate",
        &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
    ),
    // Overflow
    ("overflow-auto", &[("overflow", "auto")]),
    ("overflow-hidden", &[("overflow", "hidden")]),
    ("overflow-visible", &[("overflow", "visible")]),
    ("overflow-scroll", &[("overflow", "scroll")]),
    ("overflow-x-auto", &[("overflow-x", "auto")]),
    ("overflow-y-auto", &[("overflow-y", "auto")]),
    // Interactivity
    ("cursor-pointer", &[("cursor", "pointer")]),
    ("cursor-default", &[("cursor", "default")]),
    ("cursor-not-allowed", &[("cursor", "not-allowed")]),
    ("select-none", &[("user-select", "none")]),
    ("select-text", &[("user-select", "text")]),
    ("select-all", &[("user-select", "all")]),
    ("pointer-events-none", &[("pointer-events", "none")]),
    ("pointer-events-auto", &[("pointer-events", "auto")]),
    // Accessibility
    (
        "sr-only",
        &[
            ("position", "absolute"),
            ("width", "1px"),
            ("height", "1px"),
            ("padding", "0"),
            ("margin", "-1px"),
            ("overflow", "hidden"),
            ("clip", "rect(0, 0, 0, 0)"),
            ("white-space", "nowrap"),
            ("border-width", "0"),
        ],
    ),
];

/// A utility family backed by a theme scope: `<prefix>-<key>`
#[derive(Clone, Copy, Debug)]
struct ScaleUtility {
    prefix: &'static str,
    scope: &'static str,
    properties: &'static [&'static str],
    keywords: Declarations,
    arbitrary: ArbitraryKind,
    /// `-mt-4` is accepted
    negative: bool,
    /// The bare prefix (`shadow`) names the scope's `DEFAULT`
    bare: bool,
}

const fn scale(
    prefix: &'static str,
    scope: &'static str,
    properties: &'static [&'static str],
    arbitrary: ArbitraryKind,
) -> ScaleUtility {
    ScaleUtility {
        prefix,
        scope,
        properties,
        keywords: &[],
        arbitrary,
        negative: false,
        bare: false,
    }
}

const fn bare(utility: ScaleUtility) -> ScaleUtility {
    ScaleUtility {
        bare: true,
        ..utility
    }
}

const fn signed(utility: ScaleUtility, keywords: Declarations) -> ScaleUtility {
    ScaleUtility {
        negative: true,
        keywords,
        ..utility
    }
}

const AUTO: Declarations = &[("auto", "auto")];
const INSET: Declarations = &[("auto", "auto"), ("full", "100%")];

use ArbitraryKind::{Any, Color, Length};

/// Order matters where prefixes overlap: `gap-x` before `gap`, font size
/// before text color.
const SCALES: &[ScaleUtility] = &[
    // Backgrounds and colors
    scale("bg", "colors", &["background-color"], Color),
    scale("text", "fontSize", &["font-size"], Length),
    scale("text", "colors", &["color"], Color),
    scale("font", "fontWeight", &["font-weight"], Length),
    // Borders
    bare(scale("border", "borderWidth", &["border-width"], Length)),
    scale("border", "colors", &["border-color"], Color),
    bare(scale("rounded", "borderRadius", &["border-radius"], Length)),
    // Effects
    bare(scale("shadow", "boxShadow", &["box-shadow"], Any)),
    scale("opacity", "opacity", &["opacity"], Length),
    // Padding
    scale("p", "spacing", &["padding"], Length),
    scale("px", "spacing", &["padding-left", "padding-right"], Length),
    scale("py", "spacing", &["padding-top", "padding-bottom"], Length),
    scale("pt", "spacing", &["padding-top"], Length),
    scale("pr", "spacing", &["padding-right"], Length),
    scale("pb", "spacing", &["padding-bottom"], Length),
    scale("pl", "spacing", &["padding-left"], Length),
    // Margin
    signed(scale("m", "spacing", &["margin"], Length), AUTO),
    signed(scale("mx", "spacing", &["margin-left", "margin-right"], Length), AUTO),
    signed(scale("my", "spacing", &["margin-top", "margin-bottom"], Length), AUTO),
    signed(scale("mt", "spacing", &["margin-top"], Length), AUTO),
    signed(scale("mr", "spacing", &["margin-right"], Length), AUTO),
    signed(scale("mb", "spacing", &["margin-bottom"], Length), AUTO),
    signed(scale("ml", "spacing", &["margin-left"], Length), AUTO),
    // Gap
    scale("gap-x", "spacing", &["column-gap"], Length),
    scale("gap-y", "spacing", &["row-gap"], Length),
    scale("gap", "spacing", &["gap"], Length),
    // Sizing
    scale("w", "width", &["width"], Length),
    scale("h", "height", &["height"], Length),
    scale("min-h", "minHeight", &["min-height"], Length),
    scale("max-w", "maxWidth", &["max-width"], Length),
    // Placement
    signed(scale("inset-x", "spacing", &["left", "right"], Length), INSET),
    signed(scale("inset-y", "spacing", &["top", "bottom"], Length), INSET),
    signed(scale("inset", "spacing", &["inset"], Length), INSET),
    signed(scale("top", "spacing", &["top"], Length), INSET),
    signed(scale("right", "spacing", &["right"], Length), INSET),
    signed(scale("bottom", "spacing", &["bottom"], Length), INSET),
    signed(scale("left", "spacing", &["left"], Length), INSET),
    // Grid
    scale("grid-cols", "gridTemplateColumns", &["grid-template-columns"], Any),
];

impl ScaleUtility {
    /// Split off the value part; `None` if the name is not in this family
    fn key<'a>(&self, utility: &'a str) -> Option<(&'a str, bool)> {
        let (negative, name) = match utility.strip_prefix('-') {
            Some(rest) if self.negative => (true, rest),
            Some(_) => return None,
            None => (false, utility),
        };
        let rest = name.strip_prefix(self.prefix)?;
        if rest.is_empty() {
            return self.bare.then_some(("", negative));
        }
        rest.strip_prefix('-').map(|key| (key, negative))
    }
}

impl UtilityHandler for ScaleUtility {
    fn matches(&self, utility: &str) -> bool {
        self.key(utility).is_some()
    }

    fn build(&self, utility: &str, table: &TokenTable) -> Option<UtilityBody> {
        let (key, negative) = self.key(utility)?;

        let value = if let Some((_, literal)) = self.keywords.iter().find(|(k, _)| *k == key) {
            if negative {
                return None;
            }
            ValueRef::Literal(literal.to_string())
        } else if key.starts_with('[') {
            ValueRef::Arbitrary(arbitrary_value(key, self.arbitrary)?)
        } else {
            ValueRef::Token(lookup_scope(table, self.scope, key)?)
        };

        let mut body = UtilityBody::new(self.prefix, value, self.properties.iter().copied());
        body.negative = negative;
        Some(body)
    }
}

/// Exact-name utilities, looked up by hash
struct KeywordUtilities {
    entries: FxHashMap<&'static str, Declarations>,
}

impl UtilityHandler for KeywordUtilities {
    fn matches(&self, utility: &str) -> bool {
        self.entries.contains_key(utility)
    }

    fn build(&self, utility: &str, _table: &TokenTable) -> Option<UtilityBody> {
        let (&(property, value), fixed) = self.entries.get(utility)?.split_last()?;
        let mut body = UtilityBody::new(utility, ValueRef::Literal(value.to_string()), [property]);
        for (p, v) in fixed {
            body = body.with_fixed(*p, *v);
        }
        Some(body)
    }
}

pub(crate) fn builtin_handlers() -> Vec<Box<dyn UtilityHandler>> {
    let mut handlers: Vec<Box<dyn UtilityHandler>> = Vec::with_capacity(SCALES.len() + 1);
    handlers.push(Box::new(KeywordUtilities {
        entries: KEYWORDS.iter().copied().collect(),
    }));
    for utility in SCALES {
        handlers.push(Box::new(*utility));
    }
    handlers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::HandlerRegistry;
    use windlass_theme::{default_theme, TokenPath, TokenTable};

    fn table() -> TokenTable {
        TokenTable::from_spec(&default_theme()).unwrap()
    }

    #[test]
    fn keywords_take_precedence_over_scales() {
        let registry = HandlerRegistry::builtin();
        let body = registry.build("text-center", &table()).unwrap();
        assert_eq!(body.targets, vec!["text-align"]);
        assert_eq!(body.value, ValueRef::Literal("center".into()));
    }

    #[test]
    fn text_prefix_prefers_font_size_then_color() {
        let registry = HandlerRegistry::builtin();
        let table = table();

        let size = registry.build("text-xl", &table).unwrap();
        assert_eq!(size.targets, vec!["font-size"]);

        let color = registry.build("text-gray-600", &table).unwrap();
        assert_eq!(color.targets, vec!["color"]);
        assert_eq!(color.value, ValueRef::Token(TokenPath::new(["colors", "gray", "600"])));

        let arbitrary = registry.build("text-[#ff0000]", &table).unwrap();
        assert_eq!(arbitrary.targets, vec!["color"]);
    }

    #[test]
    fn bare_prefixes_use_default() {
        let registry = HandlerRegistry::builtin();
        let body = registry.build("shadow", &table()).unwrap();
        assert_eq!(body.value, ValueRef::Token(TokenPath::new(["boxShadow", "DEFAULT"])));
        assert!(registry.build("bg", &table()).is_none());
    }

    #[test]
    fn negative_values_only_where_allowed() {
        let registry = HandlerRegistry::builtin();
        let table = table();

        let body = registry.build("-mt-4", &table).unwrap();
        assert!(body.negative);
        assert_eq!(body.targets, vec!["margin-top"]);

        assert!(registry.build("-p-4", &table).is_none());
        assert!(registry.build("-mx-auto", &table).is_none());
    }

    #[test]
    fn margin_auto_keyword() {
        let registry = HandlerRegistry::builtin();
        let body = registry.build("mx-auto", &table()).unwrap();
        assert_eq!(body.targets, vec!["margin-left", "margin-right"]);
        assert_eq!(body.value, ValueRef::Literal("auto".into()));
    }

    #[test]
    fn multi_declaration_keywords_split_fixed_and_target() {
        let registry = HandlerRegistry::builtin();
        let body = registry.build("truncate", &table()).unwrap();
        assert_eq!(
            body.fixed,
            vec![
                ("overflow".to_string(), "hidden".to_string()),
                ("text-overflow".to_string(), "ellipsis".to_string()),
            ]
        );
        assert_eq!(body.targets, vec!["white-space"]);
    }

    #[test]
    fn gap_axis_prefixes_do_not_leak_into_gap() {
        let registry = HandlerRegistry::builtin();
        let body = registry.build("gap-x-4", &table()).unwrap();
        assert_eq!(body.targets, vec!["column-gap"]);
    }
}
