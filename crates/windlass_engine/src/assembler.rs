//! Stylesheet assembly: ordering, grouping and serialization

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::generator::{Declaration, GeneratedRule};

/// Markers replaced by the generated utilities in a template stylesheet
pub const UTILITIES_MARKERS: &[&str] = &["@tailwind utilities;", "@windlass utilities;"];

/// Markers for layers this engine does not emit; dropped from templates
const EMPTY_LAYER_MARKERS: &[&str] = &[
    "@tailwind base;",
    "@tailwind components;",
    "@windlass base;",
    "@windlass components;",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Indented, one declaration per line
    #[default]
    Expanded,
    /// No insignificant whitespace
    Compact,
}

impl OutputStyle {
    pub fn from_minify(minify: bool) -> Self {
        if minify {
            OutputStyle::Compact
        } else {
            OutputStyle::Expanded
        }
    }
}

/// Order rules by layer and serialize them.
///
/// Within a layer rules keep their given (discovery) order. Consecutive
/// rules sharing the same wrappers are emitted inside one at-rule block.
pub fn assemble(rules: &[GeneratedRule], style: OutputStyle) -> String {
    let mut ordered: Vec<&GeneratedRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.layer);

    let mut out = String::new();
    let mut start = 0;
    while start < ordered.len() {
        let wrappers = &ordered[start].wrappers;
        let end = ordered[start..]
            .iter()
            .position(|rule| &rule.wrappers != wrappers)
            .map_or(ordered.len(), |offset| start + offset);

        if style == OutputStyle::Expanded && !out.is_empty() {
            out.push('\n');
        }
        write_group(&mut out, wrappers, &ordered[start..end], style);
        start = end;
    }
    out
}

fn write_group(out: &mut String, wrappers: &[String], rules: &[&GeneratedRule], style: OutputStyle) {
    match style {
        OutputStyle::Expanded => {
            for (depth, wrapper) in wrappers.iter().enumerate() {
                let _ = writeln!(out, "{}{wrapper} {{", indent(depth));
            }
            let depth = wrappers.len();
            for (i, rule) in rules.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}{} {{", indent(depth), rule.selector);
                for declaration in &rule.declarations {
                    let _ = writeln!(out, "{}{declaration};", indent(depth + 1));
                }
                let _ = writeln!(out, "{}}}", indent(depth));
            }
            for depth in (0..wrappers.len()).rev() {
                let _ = writeln!(out, "{}}}", indent(depth));
            }
        }
        OutputStyle::Compact => {
            for wrapper in wrappers {
                let _ = write!(out, "{wrapper}{{");
            }
            for rule in rules {
                let _ = write!(out, "{}{{", rule.selector);
                for (i, declaration) in rule.declarations.iter().enumerate() {
                    if i > 0 {
                        out.push(';');
                    }
                    write_compact(out, declaration);
                }
                out.push('}');
            }
            for _ in wrappers {
                out.push('}');
            }
        }
    }
}

fn write_compact(out: &mut String, declaration: &Declaration) {
    let _ = write!(out, "{}:{}", declaration.property, declaration.value);
    if declaration.important {
        out.push_str("!important");
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Insert generated CSS into a template stylesheet.
///
/// The first utilities marker is replaced and any further ones removed;
/// base/components markers are dropped. Without a utilities marker the
/// generated CSS is appended.
pub fn apply_template(template: &str, generated: &str) -> String {
    let mut out = String::with_capacity(template.len() + generated.len());
    let mut inserted = false;

    for line in template.lines() {
        let trimmed = line.trim();
        if UTILITIES_MARKERS.contains(&trimmed) {
            if !inserted {
                out.push_str(generated.trim_end());
                out.push('\n');
                inserted = true;
            }
            continue;
        }
        if EMPTY_LAYER_MARKERS.contains(&trimmed) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    if !inserted {
        let body = out.trim_end().to_string();
        out = body;
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(generated.trim_end());
        out.push('\n');
    }
    out
}
