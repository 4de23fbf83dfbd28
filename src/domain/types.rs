use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RootKind {
    Live,
    Archived,
}

impl RootKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "Codex Sessions Directory",
            Self::Archived => "Codex Archived Sessions Directory",
        }
    }
}

/// Probe state of one session root. Listing a `NotChecked` root behaves
/// like `Absent`: an empty listing, never an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RootState {
    NotChecked,
    Present,
    Absent,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionEntry {
    pub name: String,
    pub path: PathBuf,
    pub summary: String,
    pub file_size_bytes: u64,
    pub file_modified: Option<SystemTime>,
}
