//! Windlass Theme System
//!
//! Design tokens for utility-class generation: the built-in default theme,
//! user extensions, and the resolver that merges them into one immutable
//! [`TokenTable`].
//!
//! # Overview
//!
//! - **Theme specs**: [`ThemeSpec`] is the raw nested input, either the
//!   built-in defaults or a user's `theme.extend` block
//! - **Resolution**: [`resolve`] deep-merges an extension onto a base and
//!   flattens the result, following `theme(...)` aliases
//! - **Token table**: [`TokenTable`] maps a [`TokenPath`] such as
//!   `colors.primary.dark` to a final scalar value
//!
//! # Quick Start
//!
//! ```rust
//! use windlass_theme::{default_theme, resolve, ThemeSpec};
//!
//! let mut extend = ThemeSpec::new();
//! extend.set(&["colors", "primary", "DEFAULT"], "#3b82f6").unwrap();
//! extend.set(&["colors", "primary", "dark"], "#2563eb").unwrap();
//!
//! let table = resolve(&default_theme(), &extend).unwrap();
//! assert_eq!(table.get(&["colors", "primary", "dark"]), Some("#2563eb"));
//! assert_eq!(table.get(&["colors", "gray", "600"]), Some("#4b5563"));
//! ```
//!
//! # Color groups
//!
//! Colors are grouped as `{ DEFAULT, light, dark, ...shades }`. `DEFAULT` is
//! the value used when a color name is referenced without a suffix, so
//! `bg-primary` reads `colors.primary.DEFAULT`.

mod error;
mod resolve;
mod spec;
mod table;
pub mod tokens;

pub use error::ThemeError;
pub use resolve::{resolve, resolve_theme};
pub use spec::{ThemeNode, ThemeSpec};
pub use table::{TokenPath, TokenTable};
pub use tokens::{default_theme, SCREENS, SPACING, SPACING_SCOPES};
