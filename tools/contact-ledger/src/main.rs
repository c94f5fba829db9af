//! Contact ledger CLI.
//!
//! Captures contact requests into a file-backed storage scope, lists and
//! exports the history, and hands new requests off to mail and messaging
//! apps.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contact_ledger::commands::{self, NOTHING_TO_EXPORT};
use contact_ledger::{dispatch, Config, FileScope, StdoutOpener};
use contact_ledger_common::export::ExportFormat;
use contact_ledger_common::handoff::plan_handoffs;
use contact_ledger_common::theme;
use contact_ledger_common::{
    BadgeProjection, ContactMethod, SubmissionDraft, SubmissionId, SubmissionStore, SystemClock,
};

#[derive(Parser)]
#[command(name = "contact-ledger", about = "Local contact request ledger")]
struct Cli {
    /// JSON config file.
    #[arg(long, env = "CONTACT_LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Storage directory (overrides the config file).
    #[arg(long, env = "CONTACT_LEDGER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a new contact request.
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        message: String,
        /// Preferred contact method (email, whatsapp, instagram, telegram).
        #[arg(long = "method", value_parser = parse_method)]
        methods: Vec<ContactMethod>,
        /// Skip opening mail and messaging apps.
        #[arg(long)]
        no_handoff: bool,
    },
    /// Show the history, newest first.
    List,
    /// Print the number of pending requests.
    Pending,
    /// Print the pending badge.
    Badge,
    /// Mark a request as acted upon.
    MarkSubmitted { id: String },
    /// Delete the whole history.
    Clear,
    /// Write the history as CSV.
    Export {
        /// Output path (defaults to the date-stamped file name).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Replace commas in messages instead of escaping them.
        #[arg(long)]
        legacy: bool,
    },
    /// Show or toggle the site theme preference.
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

fn parse_method(s: &str) -> Result<ContactMethod, String> {
    s.to_lowercase()
        .parse::<ContactMethod>()
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let scope = FileScope::open(&config.data_dir)
        .with_context(|| format!("opening storage at {}", config.data_dir.display()))?;
    tracing::debug!(dir = %scope.dir().display(), "storage scope ready");

    let store = SubmissionStore::new(&scope, SystemClock)
        .with_retention(config.retention)
        .with_export_format(config.export_format);

    match cli.command {
        Command::Submit {
            name,
            email,
            phone,
            service,
            message,
            methods,
            no_handoff,
        } => {
            let mut draft = SubmissionDraft {
                name,
                email,
                phone,
                service,
                message,
                contact_methods: methods,
            };
            if let Err(e) = draft.validate() {
                bail!("{e}");
            }
            let submission = store.capture(draft);
            println!("Request submitted successfully! Saved as {}", submission.id);
            println!("{}", commands::render_badge(BadgeProjection::new(&store).render()));

            if !no_handoff {
                let requests = plan_handoffs(&submission, &config.handoff);
                let outcomes = dispatch(requests, Arc::new(StdoutOpener)).join().await;
                println!("{}", commands::render_handoff_summary(&outcomes));
            }
        }
        Command::List => println!("{}", commands::render_history(&store.list())),
        Command::Pending => println!("{}", store.pending_count()),
        Command::Badge => {
            println!("{}", commands::render_badge(BadgeProjection::new(&store).render()))
        }
        Command::MarkSubmitted { id } => {
            if !store.mark_submitted(&SubmissionId(id.clone())) {
                bail!("no submission with id {id}");
            }
            println!("{}", commands::render_badge(BadgeProjection::new(&store).render()));
        }
        Command::Clear => {
            store.clear();
            println!("History cleared successfully!");
        }
        Command::Export { out, legacy } => {
            if store.list().is_empty() {
                println!("{NOTHING_TO_EXPORT}");
                return Ok(());
            }
            let store = if legacy || config.export_format == ExportFormat::LegacySemicolon {
                store
                    .with_export_format(ExportFormat::LegacySemicolon)
                    .with_file_prefix(config.handoff.business_name.to_lowercase())
            } else {
                store
            };
            let artifact = store.export();
            let path = out.unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            std::fs::write(&path, &artifact.body)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), media_type = artifact.media_type, "exported history");
            println!("History exported successfully! {}", path.display());
        }
        Command::Theme { toggle } => {
            let current = if toggle {
                theme::toggle_theme(&scope)
            } else {
                theme::load_theme(&scope)
            };
            println!("{} {}", current.icon(), current.as_str());
        }
    }

    Ok(())
}
