//! matomo-config - inspect and maintain Matomo configuration files.

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use matomo_config::{ConfigDocument, ConfigSources, Entry, Severity, reconcile_plugins, save, validate, write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { file, overlay, strict } => check(&file, overlay, strict),
        Commands::Dump { file, overlay, json } => dump(&file, overlay, json),
        Commands::Get {
            file,
            section,
            key,
            overlay,
        } => get(&file, overlay, &section, &key),
        Commands::PrunePlugins {
            file,
            plugins_dir,
            dry_run,
        } => prune_plugins(&file, &plugins_dir, dry_run),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so `dump` and `get` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(file: &Path, overlay: Option<PathBuf>) -> anyhow::Result<ConfigDocument> {
    let sources = ConfigSources {
        base: file.to_path_buf(),
        overlay,
    };
    Ok(sources.load()?)
}

fn check(file: &Path, overlay: Option<PathBuf>, strict: bool) -> anyhow::Result<ExitCode> {
    let doc = load(file, overlay)?;

    let violations = match validate(&doc) {
        Ok(()) => {
            info!(path = %file.display(), sections = doc.len(), "Configuration is valid");
            return Ok(ExitCode::SUCCESS);
        }
        Err(violations) => violations,
    };

    let mut errors = 0usize;
    for violation in &violations {
        match violation.severity() {
            Severity::Error => {
                errors += 1;
                error!("{violation}");
            }
            Severity::Warning => warn!("{violation}"),
        }
    }

    let warnings = violations.len() - errors;
    info!(path = %file.display(), errors, warnings, "Validation finished");

    if errors > 0 || (strict && warnings > 0) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn dump(file: &Path, overlay: Option<PathBuf>, json: bool) -> anyhow::Result<ExitCode> {
    let doc = load(file, overlay)?;
    if json {
        let text = serde_json::to_string_pretty(&doc).context("Failed to encode config as JSON")?;
        println!("{text}");
    } else {
        let text = write(&doc).context("Failed to render config")?;
        print!("{text}");
    }
    Ok(ExitCode::SUCCESS)
}

fn get(file: &Path, overlay: Option<PathBuf>, section: &str, key: &str) -> anyhow::Result<ExitCode> {
    let doc = load(file, overlay)?;
    match doc.get(section, key) {
        Some(Entry::Scalar(value)) => println!("{value}"),
        Some(Entry::List(items)) => {
            for item in items {
                println!("{item}");
            }
        }
        None => bail!("{section}.{key} is not set in {}", file.display()),
    }
    Ok(ExitCode::SUCCESS)
}

fn prune_plugins(file: &Path, plugins_dir: &Path, dry_run: bool) -> anyhow::Result<ExitCode> {
    if !plugins_dir.is_dir() {
        bail!("plugins directory {} does not exist", plugins_dir.display());
    }

    let mut doc = load(file, None)?;
    let report = reconcile_plugins(&mut doc, plugins_dir)
        .with_context(|| format!("Refusing to rewrite {}", file.display()))?;

    for name in &report.removed {
        info!(plugin = %name, "Removed plugin without folder");
    }
    for name in &report.registered {
        info!(plugin = %name, "Registered core plugin as installed");
    }

    if report.is_empty() {
        info!(path = %file.display(), "Plugin lists already match the plugins directory");
    } else if dry_run {
        info!(
            removed = report.removed.len(),
            registered = report.registered.len(),
            "Dry run, not writing changes"
        );
    } else {
        save(&doc, file).with_context(|| format!("Failed to write {}", file.display()))?;
        info!(path = %file.display(), "Updated plugin lists");
    }

    Ok(ExitCode::SUCCESS)
}
