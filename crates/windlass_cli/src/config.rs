//! Windlass configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use windlass_engine::{DarkMode, EngineConfig, OutputStyle, ScanOptions};
use windlass_theme::{ThemeNode, ThemeSpec};

/// File names searched for when given a directory, in order
pub const CONFIG_FILES: &[&str] = &["windlass.toml", "windlass.json"];

/// Top-level configuration (windlass.toml or windlass.json)
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindlassConfig {
    /// Globs naming the files to scan, relative to the config's directory
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default)]
    pub dark_mode: DarkMode,
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// `theme.extend` plus any scopes replaced outright
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThemeConfig {
    #[serde(default, skip_serializing_if = "ThemeSpec::is_empty")]
    pub extend: ThemeSpec,
    #[serde(flatten)]
    pub overrides: BTreeMap<String, ThemeNode>,
}

/// Build configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Template stylesheet containing `@tailwind utilities;`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Output stylesheet
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub minify: bool,
}

fn default_output() -> String {
    "styles/output.css".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: default_output(),
            minify: false,
        }
    }
}

/// A configuration together with where it was found
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: WindlassConfig,
    pub path: PathBuf,
    /// Directory `content`, `input` and `output` are relative to
    pub root: PathBuf,
}

impl WindlassConfig {
    /// Load configuration from a file, or from a directory containing one
    /// of [`CONFIG_FILES`]
    pub fn load(path: &Path) -> Result<LoadedConfig> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            CONFIG_FILES
                .iter()
                .map(|name| path.join(name))
                .find(|candidate| candidate.is_file())
                .with_context(|| {
                    format!(
                        "No windlass.toml found in {}. Run `windlass init` to create one.",
                        path.display()
                    )
                })?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::parse(&content, &config_path)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let absolute = config_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", config_path.display()))?;
        let root = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(LoadedConfig {
            config,
            path: absolute,
            root,
        })
    }

    /// Parse by file extension: `.json` is JSON, anything else TOML
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Starter configuration written by `windlass init`
    pub fn starter() -> Self {
        let palette: &[(&str, &[(&str, &str)])] = &[
            (
                "primary",
                &[("DEFAULT", "#3b82f6"), ("dark", "#2563eb"), ("light", "#60a5fa")],
            ),
            (
                "secondary",
                &[("DEFAULT", "#10b981"), ("dark", "#059669"), ("light", "#34d399")],
            ),
            ("background", &[("light", "#ffffff"), ("dark", "#1f2937")]),
            ("text", &[("light", "#1f2937"), ("dark", "#f9fafb")]),
        ];
        let colors = ThemeSpec::from_pairs(
            palette
                .iter()
                .map(|(name, shades)| (*name, ThemeSpec::from_pairs(shades.iter().copied()))),
        );
        let extend = ThemeSpec::from_pairs([("colors", colors)]);

        Self {
            content: vec![
                "./src/**/*.{rs,html,css}".to_string(),
                "./index.html".to_string(),
                "./dist/**/*.html".to_string(),
            ],
            dark_mode: DarkMode::Class,
            plugins: Vec::new(),
            theme: ThemeConfig {
                extend,
                overrides: BTreeMap::new(),
            },
            build: BuildConfig {
                input: Some("styles/input.css".to_string()),
                ..BuildConfig::default()
            },
        }
    }

    /// Engine settings for a project rooted at `root`
    pub fn engine_config(&self, root: &Path, minify: bool) -> EngineConfig {
        EngineConfig {
            root: root.to_path_buf(),
            content: self.content.clone(),
            dark_mode: self.dark_mode,
            plugins: self.plugins.clone(),
            theme: ThemeSpec::from(self.theme.overrides.clone()),
            extend: self.theme.extend.clone(),
            output_style: OutputStyle::from_minify(minify || self.build.minify),
            scan: ScanOptions::default(),
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
