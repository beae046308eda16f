//! Project scaffolding

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{WindlassConfig, CONFIG_FILES};

const INPUT_CSS: &str = r#"@tailwind base;
@tailwind components;
@tailwind utilities;

body {
  margin: 0;
}
"#;

/// Write a starter `windlass.toml` and `styles/input.css` into `path`.
///
/// Refuses to overwrite an existing configuration unless `force` is set.
/// An existing input stylesheet is always kept.
pub fn init_project(path: &Path, force: bool) -> Result<()> {
    if !force {
        if let Some(existing) = CONFIG_FILES
            .iter()
            .map(|name| path.join(name))
            .find(|candidate| candidate.exists())
        {
            bail!(
                "{} already exists. Use --force to overwrite it.",
                existing.display()
            );
        }
    }

    fs::create_dir_all(path.join("styles"))
        .with_context(|| format!("Failed to create {}", path.join("styles").display()))?;

    let config = WindlassConfig::starter();
    fs::write(path.join("windlass.toml"), config.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.join("windlass.toml").display()))?;

    let input = path.join("styles/input.css");
    if !input.exists() {
        fs::write(&input, INPUT_CSS).with_context(|| format!("Failed to write {}", input.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use windlass_engine::DarkMode;

    #[test]
    fn init_writes_a_loadable_project() {
        let dir = TempDir::new().unwrap();
        init_project(dir.path(), false).unwrap();

        let loaded = WindlassConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.config.dark_mode, DarkMode::Class);
        assert_eq!(loaded.config.build.input.as_deref(), Some("styles/input.css"));
        assert_eq!(
            fs::read_to_string(dir.path().join("styles/input.css")).unwrap(),
            INPUT_CSS
        );
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("windlass.toml"), "content = []\n").unwrap();

        assert!(init_project(dir.path(), false).is_err());
        init_project(dir.path(), true).unwrap();
        let text = fs::read_to_string(dir.path().join("windlass.toml")).unwrap();
        assert!(text.contains("#3b82f6"));
    }

    #[test]
    fn init_keeps_existing_stylesheet() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("styles")).unwrap();
        fs::write(dir.path().join("styles/input.css"), "/* mine */\n").unwrap();

        init_project(dir.path(), false).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("styles/input.css")).unwrap(),
            "/* mine */\n"
        );
    }
}
