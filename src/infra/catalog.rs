use crate::domain::{RootState, SessionEntry};
use crate::infra::{
    ListError, ScanWarningCount, dir_exists, file_display_name, list_files, live_session_entry,
    summarize_session_file, walk_jsonl_files,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CatalogSignal {
    Changed,
}

#[derive(Clone, Debug, Default)]
pub struct ListOutput {
    pub entries: Vec<SessionEntry>,
    pub warnings: ScanWarningCount,
}

/// Catalog over the two Codex session roots. Holds only paths and probe
/// state across calls; every listing re-reads disk, so results always
/// reflect the current on-disk state.
pub struct SessionCatalog {
    live_root: PathBuf,
    archived_root: PathBuf,
    live_state: RootState,
    archived_state: RootState,
    subscribers: Vec<Sender<CatalogSignal>>,
}

impl SessionCatalog {
    pub fn new(live_root: PathBuf, archived_root: PathBuf) -> Self {
        Self {
            live_root,
            archived_root,
            live_state: RootState::NotChecked,
            archived_state: RootState::NotChecked,
            subscribers: Vec::new(),
        }
    }

    /// Probes both roots. Absence is not an error; it degrades the
    /// corresponding listing to empty.
    pub fn init(&mut self) {
        self.live_state = probe(&self.live_root);
        self.archived_state = probe(&self.archived_root);
    }

    /// Re-probes the roots and fires the change signal. No cache exists to
    /// invalidate; subscribers are expected to re-invoke the listings.
    pub fn refresh(&mut self) {
        self.init();
        self.notify_changed();
    }

    /// Change-notification channel; subscribe once at construction.
    pub fn subscribe(&mut self) -> Receiver<CatalogSignal> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn live_state(&self) -> RootState {
        self.live_state
    }

    pub fn archived_state(&self) -> RootState {
        self.archived_state
    }

    pub fn list_live(&self) -> Result<ListOutput, ListError> {
        if self.live_state != RootState::Present {
            return Ok(ListOutput::default());
        }

        let walk = walk_jsonl_files(&self.live_root)?;
        let entries = walk
            .files
            .iter()
            .map(|path| live_session_entry(path))
            .collect();

        Ok(ListOutput {
            entries,
            warnings: walk.warnings,
        })
    }

    pub fn list_archived(&self) -> Result<ListOutput, ListError> {
        if self.archived_state != RootState::Present {
            return Ok(ListOutput::default());
        }

        let mut warnings = 0usize;
        let mut entries: Vec<SessionEntry> = Vec::new();
        for path in list_files(&self.archived_root)? {
            match summarize_session_file(&path) {
                Ok(entry) => entries.push(entry),
                Err(_error) => {
                    // Unreadable or malformed file: keep the entry with a
                    // filename-only summary instead of failing the listing.
                    warnings += 1;
                    entries.push(fallback_entry(&path));
                }
            }
        }

        Ok(ListOutput {
            entries,
            warnings: ScanWarningCount::from(warnings),
        })
    }

    fn notify_changed(&mut self) {
        self.subscribers
            .retain(|tx| tx.send(CatalogSignal::Changed).is_ok());
    }
}

fn probe(root: &Path) -> RootState {
    if dir_exists(root) {
        RootState::Present
    } else {
        RootState::Absent
    }
}

fn fallback_entry(path: &Path) -> SessionEntry {
    let name = file_display_name(path);
    let metadata = fs::metadata(path).ok();
    SessionEntry {
        summary: name.clone(),
        name,
        path: path.to_path_buf(),
        file_size_bytes: metadata.as_ref().map(|meta| meta.len()).unwrap_or(0),
        file_modified: metadata.and_then(|meta| meta.modified().ok()),
    }
}
