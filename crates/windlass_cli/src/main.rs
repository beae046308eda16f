//! Windlass CLI
//!
//! Build and watch utility-first stylesheets.
//!
//! # Usage
//!
//! ```bash
//! # Create windlass.toml and styles/input.css
//! windlass init
//!
//! # One-off build
//! windlass build --minify
//!
//! # Rebuild on every change under the project root
//! windlass watch
//!
//! # Show which candidate tokens become rules
//! windlass scan
//! ```

mod config;
mod output;
mod project;
mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use windlass_engine::{BuildOptions, Engine};

use crate::config::{LoadedConfig, WindlassConfig};
use crate::output::OutputTarget;

#[derive(Parser)]
#[command(name = "windlass")]
#[command(version)]
#[command(about = "Generate utility-first CSS from the classes your project uses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Clone, Debug)]
struct BuildArgs {
    /// Config file, or a directory containing windlass.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template stylesheet (overrides build.input)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output stylesheet (overrides build.output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact CSS
    #[arg(long)]
    minify: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan content and write the stylesheet once
    Build(BuildArgs),

    /// Build, then rebuild incrementally on file changes
    Watch {
        #[command(flatten)]
        build: BuildArgs,

        /// Quiet period before a rebuild, in milliseconds
        #[arg(long, default_value_t = 50)]
        debounce: u64,

        /// Poll the file system every N milliseconds instead of using
        /// native notifications
        #[arg(long)]
        poll: Option<u64>,
    },

    /// List candidate tokens and whether each becomes a rule
    Scan {
        /// Config file, or a directory containing windlass.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only print rejected tokens
        #[arg(long)]
        rejected: bool,
    },

    /// Create a starter windlass.toml and styles/input.css
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build(args) => cmd_build(&args),
        Commands::Watch {
            build,
            debounce,
            poll,
        } => cmd_watch(&build, debounce, poll),
        Commands::Scan { config, rejected } => cmd_scan(config.as_deref(), rejected),
        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    WindlassConfig::load(path.unwrap_or_else(|| Path::new(".")))
}

/// Engine plus output target, with command-line overrides applied
fn prepare(args: &BuildArgs) -> Result<(Engine, OutputTarget, PathBuf)> {
    let LoadedConfig { config, path, root } = load_config(args.config.as_deref())?;
    info!(config = %path.display(), "loaded configuration");

    let engine = Engine::new(config.engine_config(&root, args.minify))
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    let template = args
        .input
        .clone()
        .or_else(|| config.build.input.as_ref().map(|input| root.join(input)));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| root.join(&config.build.output));

    Ok((
        engine,
        OutputTarget {
            path: output,
            template,
        },
        root,
    ))
}

fn cmd_build(args: &BuildArgs) -> Result<()> {
    let (engine, target, _) = prepare(args)?;
    let report = engine.build(&BuildOptions::default());
    for warning in &report.warnings {
        warn!("{warning}");
    }

    let written = target.write(&report.stylesheet)?;
    info!(
        path = %target.path.display(),
        rules = report.rules.len(),
        files = report.files_scanned,
        written,
        "build finished"
    );
    Ok(())
}

fn cmd_watch(args: &BuildArgs, debounce: u64, poll: Option<u64>) -> Result<()> {
    let (engine, target, root) = prepare(args)?;
    let settings = watch::WatchSettings {
        root,
        debounce: Duration::from_millis(debounce),
        poll: poll.map(Duration::from_millis),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(watch::run(Arc::new(engine), target, settings))
}

fn cmd_scan(config: Option<&Path>, rejected_only: bool) -> Result<()> {
    let LoadedConfig { config, path, root } = load_config(config)?;
    let engine = Engine::new(config.engine_config(&root, false))
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    let report = engine.build(&BuildOptions {
        collect_rejections: true,
    });

    if !rejected_only {
        for rule in &report.rules {
            println!("accept  {}", rule.selector);
        }
    }
    for rejection in &report.rejected {
        println!("reject  {:<32} {}", rejection.token, rejection.reason);
    }
    println!(
        "{} files, {} candidate tokens, {} rules, {} rejected",
        report.files_scanned,
        report.tokens_seen,
        report.rules.len(),
        report.rejected.len()
    );
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    project::init_project(path, force)?;
    println!("Created windlass.toml and styles/input.css in {}", path.display());
    println!("Run `windlass build` to generate styles/output.css");
    Ok(())
}
