mod cli;
mod document;
mod error;
mod mime;
mod notify;

use crate::cli::{Cli, Command};
use crate::document::NoteDocument;
use crate::error::{ErrorKind, Result};
use crate::notify::TerminalNotifier;
use clap::Parser;
use daybook_config::Settings;
use daybook_dates::{Clock, SystemClock, format_timestamp, is_valid_format, parse_daily_note_path};
use daybook_library::{BatchOutcome, FileOutcome, IncomingFile, Intake, open_daily_note};
use daybook_storage::BackendHandle;
use daybook_storage::backend::{LocalBackend, ReadOnlyBackend};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        },
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = daybook_config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    match cli.command {
        Command::Today { no_create } => today(&cli.vault, cli.dry_run, &settings, no_create).await,
        Command::Check { path } => Ok(check(&settings, &path)),
        Command::Attach { note, files } => attach(&cli.vault, cli.dry_run, settings, &note, &files).await,
        Command::Format { format } => render_format(&format),
    }
}

/// A dry run never creates the vault root; it has to exist already.
fn open_backend(vault: &Path, dry_run: bool) -> Result<BackendHandle> {
    let root = std::path::absolute(vault).or_raise(|| ErrorKind::Vault(vault.to_path_buf()))?;
    if dry_run {
        let local = LocalBackend::existing("vault", &root).or_raise(|| ErrorKind::Vault(root.clone()))?;
        let read_only: BackendHandle = Arc::new(ReadOnlyBackend::new(Arc::new(local)));
        return Ok(read_only);
    }
    let local: BackendHandle = Arc::new(LocalBackend::new("vault", &root).or_raise(|| ErrorKind::Vault(root.clone()))?);
    Ok(local)
}

async fn today(vault: &Path, dry_run: bool, settings: &Settings, no_create: bool) -> Result<ExitCode> {
    if no_create {
        let path = daybook_library::today(&SystemClock, settings).or_raise(|| ErrorKind::DailyNote)?;
        println!("{}", path.full_path());
        return Ok(ExitCode::SUCCESS);
    }
    let backend = open_backend(vault, dry_run)?;
    let note = open_daily_note(&backend, &SystemClock, settings).await.or_raise(|| ErrorKind::DailyNote)?;
    match (note.created, dry_run) {
        (true, false) => eprintln!("Created {}", note.path.full_path()),
        (true, true) => eprintln!("Would create {}", note.path.full_path()),
        (false, _) => {},
    }
    println!("{}", note.path.full_path());
    Ok(ExitCode::SUCCESS)
}

fn check(settings: &Settings, path: &str) -> ExitCode {
    match parse_daily_note_path(path, &settings.date_format) {
        Some(date) => {
            println!("{path}: daily note for {date}");
            ExitCode::SUCCESS
        },
        None => {
            println!("{path}: not a daily note for format {}", settings.date_format);
            ExitCode::FAILURE
        },
    }
}

async fn attach(vault: &Path, dry_run: bool, settings: Settings, note: &str, files: &[PathBuf]) -> Result<ExitCode> {
    let backend = open_backend(vault, dry_run)?;
    let mut incoming = Vec::with_capacity(files.len());
    for path in files {
        let data = tokio::fs::read(path).await.or_raise(|| ErrorKind::ReadInput(path.clone()))?;
        let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime_type = mime::detect(path, &data);
        tracing::debug!(name = %name, mime_type = %mime_type, bytes = data.len(), "Read input file");
        incoming.push(IncomingFile::new(name, mime_type, data));
    }

    let mut document = NoteDocument::open(backend.as_ref(), note).await?;
    let intake = Intake::new(backend.clone(), settings, Arc::new(TerminalNotifier));
    let outcome = intake.handle(&mut document, incoming).await;
    if !outcome.is_handled() {
        if let BatchOutcome::Rejected(rejection) = &outcome {
            eprintln!("Not attached: {rejection}");
        }
        return Ok(ExitCode::from(2));
    }
    document.save(backend.as_ref()).await?;

    for file in outcome.files() {
        if let FileOutcome::Aborted { name } = file {
            println!("skipped  {name}");
        } else if let Some(attachment) = file.attachment() {
            let status = if file.is_success() { "attached" } else { "failed" };
            println!("{status:<8} {}", attachment.path);
        }
    }
    Ok(match outcome {
        BatchOutcome::PartialFailure(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

fn render_format(format: &str) -> Result<ExitCode> {
    if !is_valid_format(format) {
        exn::bail!(ErrorKind::InvalidFormat(format.to_string()));
    }
    let rendered = format_timestamp(format, SystemClock.now()).or_raise(|| ErrorKind::InvalidFormat(format.to_string()))?;
    println!("{rendered}");
    Ok(ExitCode::SUCCESS)
}
