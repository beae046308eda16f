//! Build pipeline: resolve, scan, interpret, generate, assemble

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};
use windlass_theme::{resolve_theme, ThemeSpec, TokenTable};

use crate::assembler::{assemble, OutputStyle};
use crate::error::{ConfigError, ScanWarning};
use crate::generator::{generate, generate_rule, GeneratedRule, GeneratorOptions};
use crate::interpreter::{Interpreter, TokenRejection, UtilityDescriptor};
use crate::plugin::PluginRegistry;
use crate::scanner::{scan, ContentMatcher, ScanOptions};
use crate::utility::HandlerRegistry;
use crate::variant::DarkMode;

/// Everything a build needs, already parsed from the project configuration
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Directory the `content` globs are relative to
    pub root: PathBuf,
    pub content: Vec<String>,
    pub dark_mode: DarkMode,
    /// Plugin identifiers, in registration order
    pub plugins: Vec<String>,
    /// Scopes that replace the defaults outright
    pub theme: ThemeSpec,
    /// Tokens merged onto the (possibly replaced) defaults
    pub extend: ThemeSpec,
    pub output_style: OutputStyle,
    pub scan: ScanOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep every rejected token with its reason
    pub collect_rejections: bool,
}

/// Result of a full build
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    pub stylesheet: String,
    pub rules: Vec<GeneratedRule>,
    pub files_scanned: usize,
    pub tokens_seen: usize,
    pub warnings: Vec<ScanWarning>,
    /// Empty unless [`BuildOptions::collect_rejections`] is set
    pub rejected: Vec<TokenRejection>,
}

/// A configured engine. Construction does all fatal validation; builds
/// themselves cannot fail.
pub struct Engine {
    matcher: ContentMatcher,
    table: TokenTable,
    handlers: HandlerRegistry,
    generator: GeneratorOptions,
    output_style: OutputStyle,
    scan: ScanOptions,
}

impl Engine {
    /// Resolve the theme, register plugins and compile content globs
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_plugins(config, &PluginRegistry::builtin())
    }

    /// Like [`Engine::new`], drawing plugins from a custom registry
    pub fn with_plugins(config: EngineConfig, plugins: &PluginRegistry) -> Result<Self, ConfigError> {
        let table = resolve_theme(&config.theme, &config.extend)?;

        let mut handlers = HandlerRegistry::builtin();
        for plugin in plugins.select(&config.plugins)? {
            let registered = plugin.register(&table);
            debug!(plugin = plugin.id(), handlers = registered.len(), "registered plugin");
            handlers.extend(registered);
        }

        let matcher = ContentMatcher::new(config.root, &config.content)?;

        Ok(Self {
            matcher,
            table,
            handlers,
            generator: GeneratorOptions {
                dark_mode: config.dark_mode,
            },
            output_style: config.output_style,
            scan: config.scan,
        })
    }

    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    pub fn matcher(&self) -> &ContentMatcher {
        &self.matcher
    }

    pub fn scan_options(&self) -> &ScanOptions {
        &self.scan
    }

    pub fn output_style(&self) -> OutputStyle {
        self.output_style
    }

    pub fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(&self.table, &self.handlers)
    }

    /// Interpret and generate a single token
    pub fn rule_for(&self, token: &str) -> Option<GeneratedRule> {
        let descriptor = self.interpreter().interpret(token)?;
        self.rule_for_descriptor(&descriptor)
    }

    pub(crate) fn rule_for_descriptor(&self, descriptor: &UtilityDescriptor) -> Option<GeneratedRule> {
        generate_rule(descriptor, &self.table, &self.generator)
    }

    /// Serialize rules in layer order with the configured output style
    pub fn assemble(&self, rules: &[GeneratedRule]) -> String {
        assemble(rules, self.output_style)
    }

    /// Run the whole pipeline over the current content
    pub fn build(&self, options: &BuildOptions) -> BuildReport {
        let started = Instant::now();
        let scanned = scan(&self.matcher, &self.scan);
        let tokens = scanned.tokens();

        let interpreter = self.interpreter();
        let mut rejected = Vec::new();
        let mut descriptors = Vec::with_capacity(tokens.len());
        for token in &tokens {
            if options.collect_rejections {
                match interpreter.interpret_detailed(token) {
                    Ok(descriptor) => descriptors.push(descriptor),
                    Err(reason) => rejected.push(TokenRejection {
                        token: token.clone(),
                        reason,
                    }),
                }
            } else if let Some(descriptor) = interpreter.interpret(token) {
                descriptors.push(descriptor);
            }
        }

        let rules = generate(&descriptors, &self.table, &self.generator);
        let stylesheet = self.assemble(&rules);

        info!(
            files = scanned.files_scanned(),
            tokens = tokens.len(),
            rules = rules.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "build complete"
        );

        BuildReport {
            stylesheet,
            rules,
            files_scanned: scanned.files_scanned(),
            tokens_seen: tokens.len(),
            warnings: scanned.warnings,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Rejection;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn config(root: &std::path::Path) -> EngineConfig {
        EngineConfig {
            root: root.to_path_buf(),
            content: vec!["./src/**/*.{rs,html}".into()],
            ..EngineConfig::default()
        }
    }

    #[test]
    fn unknown_plugin_aborts_construction() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.plugins = vec!["@tailwindcss/typography".into()];
        assert!(matches!(
            Engine::new(config),
            Err(ConfigError::UnknownPlugin { index: 0, .. })
        ));
    }

    #[test]
    fn theme_conflict_aborts_construction() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.extend.set(&["colors", "white", "DEFAULT"], "#fff").unwrap();
        assert!(matches!(Engine::new(config), Err(ConfigError::Theme(_))));
    }

    #[test]
    fn scope_override_replaces_defaults() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.theme.set(&["screens", "tablet"], "900px").unwrap();
        let engine = Engine::new(config).unwrap();

        assert!(engine.rule_for("md:flex").is_none());
        let rule = engine.rule_for("tablet:flex").unwrap();
        assert_eq!(rule.wrappers, vec!["@media (min-width: 900px)".to_string()]);
    }

    #[test]
    fn replacing_spacing_rescales_sizing_utilities() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path());
        config.theme.set(&["spacing", "sm"], "8px").unwrap();
        let engine = Engine::new(config).unwrap();

        assert!(engine.rule_for("p-4").is_none());
        assert!(engine.rule_for("w-4").is_none());
        let padding = engine.rule_for("p-sm").unwrap();
        assert_eq!(padding.declarations[0].value, "8px");
        let width = engine.rule_for("w-sm").unwrap();
        assert_eq!(width.declarations[0].value, "8px");
        assert_eq!(engine.rule_for("h-full").unwrap().declarations[0].value, "100%");
    }

    #[test]
    fn build_collects_rejections_on_request() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.html"), r#"<p class="flex wibble print:flex">"#).unwrap();

        let engine = Engine::new(config(dir.path())).unwrap();

        let quiet = engine.build(&BuildOptions::default());
        assert!(quiet.rejected.is_empty());
        assert_eq!(quiet.rules.len(), 1);

        let report = engine.build(&BuildOptions {
            collect_rejections: true,
        });
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.stylesheet, quiet.stylesheet);
        assert!(report.rejected.iter().any(|r| r.token == "wibble" && r.reason == Rejection::UnknownUtility));
        assert!(report
            .rejected
            .iter()
            .any(|r| r.token == "print:flex" && r.reason == Rejection::UnknownVariant("print".into())));
    }
}
