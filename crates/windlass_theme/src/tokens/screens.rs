//! Responsive breakpoints
//!
//! Each screen becomes a `<name>:` variant wrapping its rules in
//! `@media (min-width: <value>)`.

pub const SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];
