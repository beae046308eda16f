//! Color tokens

use crate::spec::{ThemeNode, ThemeSpec};

const GRAY: &[(&str, &str)] = &[
    ("50", "#f9fafb"),
    ("100", "#f3f4f6"),
    ("200", "#e5e7eb"),
    ("300", "#d1d5db"),
    ("400", "#9ca3af"),
    ("500", "#6b7280"),
    ("600", "#4b5563"),
    ("700", "#374151"),
    ("800", "#1f2937"),
    ("900", "#111827"),
    ("950", "#030712"),
];

const RED: &[(&str, &str)] = &[
    ("50", "#fef2f2"),
    ("100", "#fee2e2"),
    ("200", "#fecaca"),
    ("300", "#fca5a5"),
    ("400", "#f87171"),
    ("500", "#ef4444"),
    ("600", "#dc2626"),
    ("700", "#b91c1c"),
    ("800", "#991b1b"),
    ("900", "#7f1d1d"),
];

const BLUE: &[(&str, &str)] = &[
    ("50", "#eff6ff"),
    ("100", "#dbeafe"),
    ("200", "#bfdbfe"),
    ("300", "#93c5fd"),
    ("400", "#60a5fa"),
    ("500", "#3b82f6"),
    ("600", "#2563eb"),
    ("700", "#1d4ed8"),
    ("800", "#1e40af"),
    ("900", "#1e3a8a"),
];

const GREEN: &[(&str, &str)] = &[
    ("50", "#f0fdf4"),
    ("100", "#dcfce7"),
    ("200", "#bbf7d0"),
    ("300", "#86efac"),
    ("400", "#4ade80"),
    ("500", "#22c55e"),
    ("600", "#16a34a"),
    ("700", "#15803d"),
    ("800", "#166534"),
    ("900", "#14532d"),
];

/// Default color scope: keywords plus shade groups
pub(crate) fn colors() -> ThemeSpec {
    let mut colors = ThemeSpec::from_pairs([
        ("inherit", "inherit"),
        ("current", "currentColor"),
        ("transparent", "transparent"),
        ("black", "#000000"),
        ("white", "#ffffff"),
    ]);
    for (name, shades) in [("gray", GRAY), ("red", RED), ("blue", BLUE), ("green", GREEN)] {
        colors.insert(
            name,
            ThemeNode::Table(ThemeSpec::from_pairs(shades.iter().copied())),
        );
    }
    colors
}
