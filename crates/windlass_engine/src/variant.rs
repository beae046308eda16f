//! Variant tags (`dark:`, `hover:`, `md:`)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use windlass_theme::TokenTable;

/// How the `dark:` variant is activated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    /// `@media (prefers-color-scheme: dark)`
    #[default]
    Media,
    /// A `.dark` class on an ancestor element
    Class,
}

/// Pseudo-class variants, appended to the class selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    Hover,
    Focus,
    FocusWithin,
    FocusVisible,
    Active,
    Visited,
    Disabled,
    First,
    Last,
    Odd,
    Even,
}

impl PseudoClass {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "hover" => Self::Hover,
            "focus" => Self::Focus,
            "focus-within" => Self::FocusWithin,
            "focus-visible" => Self::FocusVisible,
            "active" => Self::Active,
            "visited" => Self::Visited,
            "disabled" => Self::Disabled,
            "first" => Self::First,
            "last" => Self::Last,
            "odd" => Self::Odd,
            "even" => Self::Even,
            _ => return None,
        })
    }

    /// Selector suffix, including the leading colon
    pub fn selector(self) -> &'static str {
        match self {
            Self::Hover => ":hover",
            Self::Focus => ":focus",
            Self::FocusWithin => ":focus-within",
            Self::FocusVisible => ":focus-visible",
            Self::Active => ":active",
            Self::Visited => ":visited",
            Self::Disabled => ":disabled",
            Self::First => ":first-child",
            Self::Last => ":last-child",
            Self::Odd => ":nth-child(odd)",
            Self::Even => ":nth-child(even)",
        }
    }
}

/// A parsed variant tag
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Dark,
    Pseudo(PseudoClass),
    /// Responsive breakpoint from the theme's `screens` scope
    Screen { name: String, min_width: String },
}

impl Variant {
    /// Parse a variant tag. Screens are looked up in `table`.
    pub fn parse(tag: &str, table: &TokenTable) -> Option<Self> {
        if tag == "dark" {
            return Some(Variant::Dark);
        }
        if let Some(pseudo) = PseudoClass::from_tag(tag) {
            return Some(Variant::Pseudo(pseudo));
        }
        table.get(&["screens", tag]).map(|min_width| Variant::Screen {
            name: tag.to_string(),
            min_width: min_width.to_string(),
        })
    }
}

/// Variant chain of one class, outermost first
pub type VariantChain = SmallVec<[Variant; 2]>;
