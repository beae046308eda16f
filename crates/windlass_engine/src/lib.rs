//! Windlass Engine
//!
//! Content-driven utility CSS generation. Given a resolved theme and a set
//! of content globs, the engine finds the utility classes a project uses and
//! emits exactly the rules they need.
//!
//! # Pipeline
//!
//! - **Scanner**: [`ContentMatcher`] enumerates files; [`extract_tokens`]
//!   pulls candidate class tokens out of their text
//! - **Interpreter**: [`Interpreter`] parses variants and resolves the
//!   utility against the token table and the [`HandlerRegistry`]
//! - **Generator**: [`generate`] turns descriptors into [`GeneratedRule`]s
//! - **Assembler**: [`assemble`] orders rules by [`Layer`] and serializes
//!
//! [`Engine`] wires the stages together; [`IncrementalBuild`] and
//! [`WatchCoordinator`] keep the output current as files change.
//!
//! # Example
//!
//! ```rust,no_run
//! use windlass_engine::{BuildOptions, DarkMode, Engine, EngineConfig};
//!
//! let config = EngineConfig {
//!     root: ".".into(),
//!     content: vec!["./src/**/*.{rs,html}".into()],
//!     dark_mode: DarkMode::Class,
//!     ..EngineConfig::default()
//! };
//! let engine = Engine::new(config).unwrap();
//! let report = engine.build(&BuildOptions::default());
//! println!("{}", report.stylesheet);
//! ```

pub mod assembler;
pub mod engine;
pub mod error;
pub mod generator;
pub mod incremental;
pub mod interpreter;
pub mod plugin;
pub mod scanner;
pub mod utility;
pub mod variant;
pub mod watch;

pub use assembler::{apply_template, assemble, OutputStyle};
pub use engine::{BuildOptions, BuildReport, Engine, EngineConfig};
pub use error::{ConfigError, EngineError, Result, ScanWarning, ScanWarningKind};
pub use generator::{
    escape_class, generate, generate_rule, Declaration, GeneratedRule, GeneratorOptions, Layer,
    DARK_CLASS_SELECTOR,
};
pub use incremental::{CancelToken, ChangeEvent, IncrementalBuild, RebuildSummary};
pub use interpreter::{interpret, Interpreter, Rejection, TokenRejection, UtilityDescriptor};
pub use plugin::{PluginRegistry, UtilityPlugin};
pub use scanner::{extract_tokens, scan, scan_file, ContentMatcher, ScanOptions, ScanOutput};
pub use utility::{HandlerRegistry, UtilityBody, UtilityHandler, ValueRef};
pub use variant::{DarkMode, PseudoClass, Variant, VariantChain};
pub use watch::{RebuildSink, WatchCoordinator, WatchOptions, WatchStats};

pub use windlass_theme::{TokenPath, TokenTable};
