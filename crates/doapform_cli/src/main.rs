//! Command line host for the DOAP project form.
//!
//! # Responsibility
//! - Capture a form saved as JSON into preview text and downloads.
//! - Load a saved document back into form JSON.
//!
//! # Commands
//! - `doapform capture --form form.json [--out-dir dir]`
//! - `doapform load --document doc.json [--form-out form.json]`
//! - `doapform preview --document doc.json [--html]`
//! - `doapform version`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use doapform_core::{
    core_version, escape_angle_brackets, init_logging_from_config, load_config,
    load_persisted_document, render_turtle, write_artifact, FormState, StateSynchronizer,
    SyncConfig,
};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "doapform", about = "Build DOAP project descriptions from form data")]
struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Capture a form and print the Turtle preview.
    Capture(CaptureArgs),
    /// Load a saved document into a blank form.
    Load(LoadArgs),
    /// Print the Turtle text of a saved document.
    Preview(PreviewArgs),
    /// Print the core version.
    Version,
}

#[derive(Debug, clap::Args)]
struct CaptureArgs {
    /// Form state as JSON.
    #[arg(long)]
    form: PathBuf,

    /// Directory that receives the `.doap` and `.json` downloads.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Fixed `dc:issued` timestamp instead of the current time.
    #[arg(long)]
    issued: Option<String>,
}

#[derive(Debug, clap::Args)]
struct LoadArgs {
    /// Saved `.json` document.
    #[arg(long)]
    document: PathBuf,

    /// Write the repopulated form here instead of discarding it.
    #[arg(long)]
    form_out: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct PreviewArgs {
    /// Saved `.json` document.
    #[arg(long)]
    document: PathBuf,

    /// Escape angle brackets for HTML display.
    #[arg(long)]
    html: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    init_logging_from_config(&config.logging)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    match cli.cmd {
        Command::Capture(args) => run_capture(config, args),
        Command::Load(args) => run_load(config, args),
        Command::Preview(args) => run_preview(args),
        Command::Version => {
            println!("doapform {}", core_version());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_capture(config: SyncConfig, args: CaptureArgs) -> Result<ExitCode> {
    let form: FormState = read_json(&args.form)?;
    let mut sync = match args.issued {
        Some(issued) => StateSynchronizer::with_clock(config, Box::new(move || issued.clone())),
        None => StateSynchronizer::new(config),
    };

    let report = sync.capture(&form);
    let description = sync
        .current()
        .context("capture did not produce a record")?;
    println!("{}", render_turtle(description));

    if let Some(dir) = args.out_dir.as_deref() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for artifact in sync.downloads(&form)? {
            let path = write_artifact(dir, &artifact)?;
            eprintln!("wrote {}", path.display());
        }
    }

    if report.is_missing_project_uri() {
        for notice in &report.notices {
            eprintln!("{notice}");
        }
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_load(config: SyncConfig, args: LoadArgs) -> Result<ExitCode> {
    let raw = std::fs::read(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let mut sync = StateSynchronizer::new(config);
    let mut form = FormState::new();
    sync.load(&raw, &mut form)
        .with_context(|| format!("failed to load {}", args.document.display()))?;

    let description = sync.current().context("load did not produce a record")?;
    println!("{}", render_turtle(description));

    if let Some(path) = args.form_out.as_deref() {
        let text = serde_json::to_string_pretty(&form)?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("event=form_export module=cli status=ok");
        eprintln!("wrote {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_preview(args: PreviewArgs) -> Result<ExitCode> {
    let raw = std::fs::read(&args.document)
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let description = load_persisted_document(&raw)
        .with_context(|| format!("failed to load {}", args.document.display()))?;
    let turtle = render_turtle(&description);
    if args.html {
        println!("{}", escape_angle_brackets(&turtle));
    } else {
        println!("{turtle}");
    }
    Ok(ExitCode::SUCCESS)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if raw.is_empty() {
        bail!("{} is empty", path.display());
    }
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
