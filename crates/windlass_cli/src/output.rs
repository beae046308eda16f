//! Writing the generated stylesheet

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use windlass_engine::{apply_template, EngineError};

/// Where the stylesheet goes, and the template it is inserted into
#[derive(Clone, Debug)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub template: Option<PathBuf>,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> EngineError + '_ {
    move |source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl OutputTarget {
    /// Final file contents for `stylesheet`
    pub fn render(&self, stylesheet: &str) -> windlass_engine::Result<String> {
        match &self.template {
            Some(template) => {
                let text = fs::read_to_string(template).map_err(io_error(template))?;
                Ok(apply_template(&text, stylesheet))
            }
            None => Ok(stylesheet.to_string()),
        }
    }

    /// Write the rendered stylesheet. Returns `false` when the file already
    /// held identical contents and was left untouched.
    pub fn write(&self, stylesheet: &str) -> windlass_engine::Result<bool> {
        let contents = self.render(stylesheet)?;
        if fs::read_to_string(&self.path).is_ok_and(|existing| existing == contents) {
            debug!(path = %self.path.display(), "output unchanged");
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        fs::write(&self.path, contents).map_err(io_error(&self.path))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn writes_through_template_and_skips_identical_output() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("input.css");
        fs::write(&template, "@tailwind utilities;\nbody { margin: 0; }\n").unwrap();

        let target = OutputTarget {
            path: dir.path().join("out/styles.css"),
            template: Some(template),
        };
        assert!(target.write(".flex{display:flex}").unwrap());
        assert_eq!(
            fs::read_to_string(&target.path).unwrap(),
            ".flex{display:flex}\nbody { margin: 0; }\n"
        );
        assert!(!target.write(".flex{display:flex}").unwrap());
    }

    #[test]
    fn missing_template_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let target = OutputTarget {
            path: dir.path().join("out.css"),
            template: Some(dir.path().join("missing.css")),
        };
        assert!(matches!(target.write(""), Err(EngineError::Io { .. })));
    }
}
