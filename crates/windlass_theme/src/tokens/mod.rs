//! Built-in design tokens
//!
//! The default theme every build starts from:
//! - Colors
//! - Spacing and sizing (width, height, max-width, min-height)
//! - Typography (font sizes, weights)
//! - Border radii and widths
//! - Shadows
//! - Opacity
//! - Grid templates
//! - Screens (responsive breakpoints)

mod color;
mod opacity;
mod radius;
mod screens;
mod shadow;
mod spacing;
mod typography;

use crate::spec::{ThemeNode, ThemeSpec};

pub use screens::SCREENS;
pub use spacing::SPACING;

/// Scopes whose scale starts from the final `spacing` scope
pub const SPACING_SCOPES: &[&str] = &["width", "height"];

/// The built-in base theme, with the spacing scale copied into
/// [`SPACING_SCOPES`].
///
/// To have user spacing flow into width and height, resolve through
/// [`resolve_theme`](crate::resolve_theme) instead of merging onto this.
pub fn default_theme() -> ThemeSpec {
    with_spacing_scales(&base_theme(), &ThemeSpec::new())
}

/// Defaults before the spacing scale is layered into the sizing scopes
pub(crate) fn base_theme() -> ThemeSpec {
    ThemeSpec::from_pairs([
        ("colors", ThemeNode::Table(color::colors())),
        ("spacing", table(SPACING)),
        ("width", ThemeNode::Table(spacing::width())),
        ("height", ThemeNode::Table(spacing::height())),
        ("maxWidth", table(spacing::MAX_WIDTH)),
        ("minHeight", table(spacing::MIN_HEIGHT)),
        ("fontSize", table(typography::FONT_SIZE)),
        ("fontWeight", table(typography::FONT_WEIGHT)),
        ("borderRadius", table(radius::BORDER_RADIUS)),
        ("borderWidth", table(radius::BORDER_WIDTH)),
        ("boxShadow", table(shadow::BOX_SHADOW)),
        ("opacity", table(opacity::OPACITY)),
        ("gridTemplateColumns", ThemeNode::Table(spacing::grid_template_columns())),
        ("screens", table(SCREENS)),
    ])
}

/// Layer `spacing` underneath every [`SPACING_SCOPES`] table. Entries a
/// scope defines itself win. Scopes present in `replaced` are left as the
/// user wrote them.
pub(crate) fn with_spacing_scales(spec: &ThemeSpec, replaced: &ThemeSpec) -> ThemeSpec {
    let Some(spacing) = spec.get("spacing").and_then(ThemeNode::as_table) else {
        return spec.clone();
    };

    let mut out = spec.clone();
    for scope in SPACING_SCOPES {
        if replaced.get(scope).is_some() {
            continue;
        }
        let Some(own) = spec.get(scope).and_then(ThemeNode::as_table) else {
            continue;
        };
        let mut scale = spacing.clone();
        for (key, node) in own.iter() {
            scale.insert(key, node.clone());
        }
        out.insert(*scope, scale);
    }
    out
}

fn table(pairs: &[(&str, &str)]) -> ThemeNode {
    ThemeNode::Table(ThemeSpec::from_pairs(pairs.iter().copied()))
}
