//! File system watcher for dev mode.
//!
//! Every relevant change triggers a full rebuild; events are only logged,
//! they never narrow what gets rebuilt.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Signal::Change   ┌──────────────────────────────────┐
//! │ notify thread│ ────────────────► │ worker (main thread)             │
//! └──────────────┘                   │                                  │
//! ┌──────────────┐  Signal::Stop     │  idle ──first event──► draining  │
//! │ Ctrl+C       │ ────────────────► │   ▲                      │       │
//! └──────────────┘                   │   │      quiet for settle_ms     │
//!                                    │   └────── building ◄─────┘       │
//!                                    └──────────────────────────────────┘
//! ```
//!
//! One worker drains the channel, so builds never overlap: events that
//! arrive during a build wait in the channel and become the next burst.

use crate::{
    build::build_all,
    config::SiteConfig,
    log,
    logger::timestamp,
    utils::bundle::{Bundler, is_temp_entry},
};
use anyhow::{Context, Result};
use notify::{
    Event, EventKind, RecursiveMode, Watcher,
    event::ModifyKind,
};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    time::Duration,
};

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Modify,
    Rename,
    Remove,
    Other,
}

impl ChangeKind {
    /// Map a notify event kind. Pure access events yield `None`.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Access(_) => None,
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Modify(_) => Some(Self::Modify),
            EventKind::Remove(_) => Some(Self::Remove),
            EventKind::Any | EventKind::Other => Some(Self::Other),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Rename => "rename",
            Self::Remove => "remove",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// Messages consumed by the rebuild worker.
#[derive(Debug)]
pub enum Signal {
    Change(WatchEvent),
    Stop,
}

/// Changes in `event` worth a rebuild.
///
/// Temporary bundler entries and anything under `output` are written by
/// the pipeline itself and are skipped.
pub fn relevant_changes(event: &Event, output: &Path) -> Vec<WatchEvent> {
    let Some(kind) = ChangeKind::from_event_kind(&event.kind) else {
        return Vec::new();
    };

    event
        .paths
        .iter()
        .filter(|path| !is_temp_entry(path) && !path.starts_with(output))
        .map(|path| WatchEvent {
            kind,
            path: path.clone(),
        })
        .collect()
}

// =============================================================================
// Worker
// =============================================================================

/// Drain `rx`, running `rebuild` once per burst of changes.
///
/// A burst ends once no signal arrives for `settle`. Returns on
/// [`Signal::Stop`] or when every sender is gone; a stop received
/// mid-burst discards the burst.
pub fn run_worker(rx: &Receiver<Signal>, settle: Duration, root: &Path, mut rebuild: impl FnMut()) {
    loop {
        match rx.recv() {
            Ok(Signal::Change(event)) => log_event(&event, root),
            Ok(Signal::Stop) | Err(_) => return,
        }

        loop {
            match rx.recv_timeout(settle) {
                Ok(Signal::Change(event)) => log_event(&event, root),
                Ok(Signal::Stop) => return,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }

        rebuild();
    }
}

fn log_event(event: &WatchEvent, root: &Path) {
    let rel = event.path.strip_prefix(root).unwrap_or(&event.path);
    log!("watch"; "{} {} {}", timestamp(), event.kind, rel.display());
}

// =============================================================================
// Public API
// =============================================================================

/// Build once, then rebuild on every burst of source changes until Ctrl+C.
///
/// Build failures are logged and never end the loop.
pub fn watch_for_changes_blocking(config: &SiteConfig, bundler: &dyn Bundler) -> Result<()> {
    let rebuild = || {
        if let Err(e) = build_all(config, bundler) {
            log!("error"; "{e:#}");
        }
    };

    rebuild();

    let (tx, rx) = mpsc::channel();
    let mut watcher = create_watcher(tx.clone(), config.build.output.clone())?;

    let build = &config.build;
    watcher
        .watch(&build.src, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", build.src.display()))?;
    if build.public.is_dir() {
        watcher
            .watch(&build.public, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", build.public.display()))?;
    }

    install_stop_handler(tx)?;

    let root = config.get_root();
    log!("watch"; "watching {} for changes, Ctrl+C to stop", format_watched(config));
    if config.config_path.is_file() {
        let rel = config.config_path.strip_prefix(root).unwrap_or(&config.config_path);
        log!("watch"; "{} is not watched, restart to apply changes", rel.display());
    }

    run_worker(&rx, Duration::from_millis(config.watch.settle_ms), root, rebuild);

    log!("watch"; "stopped");
    Ok(())
}

fn create_watcher(tx: Sender<Signal>, output: PathBuf) -> Result<impl Watcher> {
    notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            for change in relevant_changes(&event, &output) {
                // The worker is gone only while shutting down
                let _ = tx.send(Signal::Change(change));
            }
        }
        Err(e) => log!("watch"; "error: {e}"),
    })
    .context("Failed to create file watcher")
}

/// First Ctrl+C stops after the current build, the second exits at once.
fn install_stop_handler(tx: Sender<Signal>) -> Result<()> {
    let requested = AtomicBool::new(false);
    ctrlc::set_handler(move || {
        if requested.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        log!("watch"; "stopping...");
        let _ = tx.send(Signal::Stop);
    })
    .context("Failed to set Ctrl+C handler")
}

/// `src/, public/`
fn format_watched(config: &SiteConfig) -> String {
    let root = config.get_root();
    [&config.build.src, &config.build.public]
        .into_iter()
        .filter(|dir| dir.is_dir())
        .map(|dir| format!("{}/", dir.strip_prefix(root).unwrap_or(dir).display()))
        .collect::<Vec<_>>()
        .join(", ")
}
