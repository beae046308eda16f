//! Running the `windlass` binary against a scratch project

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn windlass(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_windlass"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run windlass")
}

#[test]
fn init_then_build() {
    let dir = TempDir::new().unwrap();
    assert!(windlass(dir.path(), &["init"]).status.success());

    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/app.rs"),
        r#"html! { <div class="bg-primary dark:bg-primary-dark p-4"></div> }"#,
    )
    .unwrap();

    let output = windlass(dir.path(), &["build"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let css = fs::read_to_string(dir.path().join("styles/output.css")).unwrap();
    assert!(css.starts_with(".bg-primary {\n  background-color: #3b82f6;\n}"));
    assert!(css.contains(".dark .dark\\:bg-primary-dark {"));
    assert!(css.contains("body {\n  margin: 0;\n}"));
    assert!(!css.contains("@tailwind"));
}

#[test]
fn minified_build_to_explicit_output() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("windlass.toml"),
        "content = [\"index.html\"]\n",
    )
    .unwrap();
    fs::write(dir.path().join("index.html"), r#"<p class="flex md:hidden">"#).unwrap();

    let output = windlass(dir.path(), &["build", "--minify", "-o", "dist/site.css"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let css = fs::read_to_string(dir.path().join("dist/site.css")).unwrap();
    assert_eq!(
        css,
        ".flex{display:flex}@media (min-width: 768px){.md\\:hidden{display:none}}"
    );
}

#[test]
fn config_errors_fail_the_build() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("windlass.toml"),
        "content = [\"src/**\"]\nplugins = [\"@tailwindcss/forms\"]\n",
    )
    .unwrap();

    let output = windlass(dir.path(), &["build"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plugins[0]"), "{stderr}");
}

#[test]
fn scan_reports_accepted_and_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("windlass.toml"), "content = [\"*.html\"]\n").unwrap();
    fs::write(dir.path().join("a.html"), "flex wibble").unwrap();

    let output = windlass(dir.path(), &["scan"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("accept  .flex"));
    assert!(stdout.contains("reject  wibble"));
}
