//! Spacing and sizing tokens

use crate::spec::ThemeSpec;

/// 4px-based spacing scale (`1` = 0.25rem)
pub const SPACING: &[(&str, &str)] = &[
    ("0", "0px"),
    ("px", "1px"),
    ("0.5", "0.125rem"),
    ("1", "0.25rem"),
    ("1.5", "0.375rem"),
    ("2", "0.5rem"),
    ("2.5", "0.625rem"),
    ("3", "0.75rem"),
    ("3.5", "0.875rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("7", "1.75rem"),
    ("8", "2rem"),
    ("9", "2.25rem"),
    ("10", "2.5rem"),
    ("11", "2.75rem"),
    ("12", "3rem"),
    ("14", "3.5rem"),
    ("16", "4rem"),
    ("20", "5rem"),
    ("24", "6rem"),
    ("28", "7rem"),
    ("32", "8rem"),
    ("36", "9rem"),
    ("40", "10rem"),
    ("44", "11rem"),
    ("48", "12rem"),
    ("52", "13rem"),
    ("56", "14rem"),
    ("60", "15rem"),
    ("64", "16rem"),
    ("72", "18rem"),
    ("80", "20rem"),
    ("96", "24rem"),
];

const FRACTIONS: &[(&str, &str)] = &[
    ("1/2", "50%"),
    ("1/3", "33.333333%"),
    ("2/3", "66.666667%"),
    ("1/4", "25%"),
    ("3/4", "75%"),
    ("1/5", "20%"),
    ("2/5", "40%"),
    ("3/5", "60%"),
    ("4/5", "80%"),
];

const INTRINSIC: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("full", "100%"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];

pub(crate) const MAX_WIDTH: &[(&str, &str)] = &[
    ("none", "none"),
    ("0", "0rem"),
    ("xs", "20rem"),
    ("sm", "24rem"),
    ("md", "28rem"),
    ("lg", "32rem"),
    ("xl", "36rem"),
    ("2xl", "42rem"),
    ("3xl", "48rem"),
    ("4xl", "56rem"),
    ("5xl", "64rem"),
    ("6xl", "72rem"),
    ("7xl", "80rem"),
    ("full", "100%"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("prose", "65ch"),
];

pub(crate) const MIN_HEIGHT: &[(&str, &str)] = &[
    ("0", "0px"),
    ("full", "100%"),
    ("screen", "100vh"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];

/// Size keywords shared by width and height. The spacing scale is layered
/// underneath once the final `spacing` scope is known.
fn sizing(screen: &str) -> ThemeSpec {
    let mut spec = ThemeSpec::from_pairs(FRACTIONS.iter().chain(INTRINSIC).copied());
    spec.insert("screen", screen);
    spec
}

pub(crate) fn width() -> ThemeSpec {
    sizing("100vw")
}

pub(crate) fn height() -> ThemeSpec {
    sizing("100vh")
}

pub(crate) fn grid_template_columns() -> ThemeSpec {
    let mut spec = ThemeSpec::from_pairs(
        (1..=12).map(|n| (n.to_string(), format!("repeat({n}, minmax(0, 1fr))"))),
    );
    spec.insert("none", "none");
    spec
}
