//! Draftpad - a markdown editing bridge with live preview and autosave.
//!
//! # Usage
//!
//! ```bash
//! draftpad notes.md
//! draftpad --watch --preview notes.html notes.md
//! draftpad --user alice --list
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use draftpad::config::{
    ConfigFlags, clear_config_flags, default_store_path, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use draftpad::session::{Message, NoticeLevel, Session};
use draftpad::store::{AuthProvider, DocumentStore, Identity, LocalStore, StaticAuth};
use draftpad::watcher::FileWatcher;

/// How often the watch loop polls for file changes and autosave work.
const POLL_INTERVAL_MS: u64 = 250;

/// Debounce applied to raw file-system events before re-importing.
const WATCH_DEBOUNCE_MS: u64 = 200;

/// A markdown editing bridge with live preview and autosave
#[derive(Parser, Debug)]
#[command(name = "draftpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Document id (defaults to the file stem)
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Keep running and feed file changes into the session
    #[arg(short, long)]
    watch: bool,

    /// Write an HTML preview here on every change
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Path of the local document store
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// User id to edit as
    #[arg(long, value_name = "ID")]
    user: Option<String>,

    /// Edit without an identity (preview only, no persistence)
    #[arg(long)]
    anonymous: bool,

    /// Rename the document
    #[arg(long, value_name = "NAME")]
    rename: Option<String>,

    /// Export the current content to document.md in this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// List the user's documents and exit
    #[arg(long)]
    list: bool,

    /// Delete a document by id and exit
    #[arg(long, value_name = "ID")]
    delete: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let store_path = effective.store.clone().unwrap_or_else(default_store_path);
    let store = LocalStore::open(&store_path)
        .with_context(|| format!("Failed to open store {}", store_path.display()))?;

    let auth = if effective.anonymous {
        StaticAuth::anonymous()
    } else {
        StaticAuth::signed_in(effective.user.clone().unwrap_or_else(|| "local".to_string()))
    };
    let identity = auth.current_user()?;

    if cli.list {
        return list_documents(store, identity.as_ref());
    }
    if let Some(id) = &cli.delete {
        return delete_document(store, id);
    }

    let file = cli
        .file
        .clone()
        .context("No file given. Pass a markdown file to edit, or --list/--delete.")?;
    let id = cli.id.clone().unwrap_or_else(|| {
        file.file_stem()
            .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string())
    });

    let start = Instant::now();
    let mut session = Session::open(store, identity, id);
    report_notice(&mut session);

    if file.exists() {
        session.import_picked(&file, now_ms(start));
        report_notice(&mut session);
    } else if !cli.watch {
        anyhow::bail!("File not found: {}", file.display());
    }

    if let Some(name) = &cli.rename {
        session.handle(Message::Rename(name.clone()), now_ms(start));
    }

    write_preview(&session, cli.preview.as_deref())?;
    print_status(&session);

    if cli.watch {
        run_watch_loop(&mut session, &file, cli.preview.as_deref(), start)?;
    } else {
        // One-shot: flush the pending writes immediately instead of
        // waiting out the debounce windows.
        session.handle(Message::SaveRequested, now_ms(start));
        report_notice(&mut session);
    }

    if let Some(dir) = &cli.export {
        let path = session.export_to(dir).context("Export failed")?;
        println!("Exported to {}", path.display());
    }

    session.close();
    Ok(())
}

fn now_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Re-import the file on every debounced change, re-render the preview,
/// and let the session's autosave schedule the persistence writes.
fn run_watch_loop(
    session: &mut Session<LocalStore>,
    file: &std::path::Path,
    preview: Option<&std::path::Path>,
    start: Instant,
) -> Result<()> {
    let mut watcher = FileWatcher::new(file, Duration::from_millis(WATCH_DEBOUNCE_MS))
        .with_context(|| format!("Failed to watch {}", file.display()))?;
    tracing::info!(path = %watcher.target().display(), "watching for changes");

    loop {
        std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        let now = now_ms(start);
        if watcher.take_change_ready() {
            session.import_picked(file, now);
            write_preview(session, preview)?;
            print_status(session);
        }
        session.tick(now);
        report_notice(session);
    }
}

fn write_preview<S: DocumentStore>(
    session: &Session<S>,
    preview: Option<&std::path::Path>,
) -> Result<()> {
    if let Some(path) = preview {
        std::fs::write(path, session.model().preview_html())
            .with_context(|| format!("Failed to write preview {}", path.display()))?;
    }
    Ok(())
}

fn print_status<S: DocumentStore>(session: &Session<S>) {
    let model = session.model();
    let words = model.word_count();
    if words == 0 {
        println!("{}: no content", model.name);
    } else {
        println!("{}: {} words", model.name, words);
    }
}

fn report_notice<S: DocumentStore>(session: &mut Session<S>) {
    if let Some(notice) = session.take_notice() {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Warning => tracing::warn!("{}", notice.message),
            NoticeLevel::Error => eprintln!("[error] {}", notice.message),
        }
    }
}

fn list_documents(mut store: LocalStore, identity: Option<&Identity>) -> Result<()> {
    let Some(identity) = identity else {
        anyhow::bail!("--list requires an identity; drop --anonymous");
    };
    let mut records = store.list(&identity.user_id)?;
    records.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
    if records.is_empty() {
        println!("No documents for {}", identity.user_id);
        return Ok(());
    }
    for record in records {
        println!("{}  {}", record.id, record.name);
    }
    Ok(())
}

fn delete_document(mut store: LocalStore, id: &str) -> Result<()> {
    store.delete(id).context("Delete failed")?;
    println!("Deleted {id}");
    Ok(())
}
