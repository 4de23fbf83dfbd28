use crate::domain::{SessionEntry, extract_summary, parse_records};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanWarningCount(usize);

impl From<usize> for ScanWarningCount {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl ScanWarningCount {
    pub fn get(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read directory: {0}")]
    DirectoryRead(String),
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("failed to read session file: {0}")]
    ReadFile(String),

    #[error("malformed record in {path}: {source}")]
    MalformedRecord {
        path: String,
        #[source]
        source: crate::domain::ParseRecordsError,
    },
}

#[derive(Clone, Debug)]
pub struct WalkOutput {
    pub files: Vec<PathBuf>,
    pub warnings: ScanWarningCount,
}

/// Recursively collects regular `.jsonl` files under `root`. Unreadable
/// entries below the root count as warnings; an unreadable root is an error.
pub fn walk_jsonl_files(root: &Path) -> Result<WalkOutput, ListError> {
    if !fs::metadata(root).is_ok_and(|meta| meta.is_dir()) {
        return Err(ListError::DirectoryRead(root.display().to_string()));
    }

    let mut warnings = 0usize;
    let mut files: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_error) => {
                warnings += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some("jsonl") {
            continue;
        }

        files.push(entry.path().to_path_buf());
    }

    Ok(WalkOutput {
        files,
        warnings: ScanWarningCount::from(warnings),
    })
}

/// Single-level listing of regular files; the archived root is known flat.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, ListError> {
    let entries = fs::read_dir(root)
        .map_err(|error| ListError::DirectoryRead(format!("{}: {error}", root.display())))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|error| ListError::DirectoryRead(format!("{}: {error}", root.display())))?;
        let is_file = entry.file_type().is_ok_and(|kind| kind.is_file());
        if is_file {
            files.push(entry.path());
        }
    }

    Ok(files)
}

pub fn file_display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Entry for a live session file: the displayed summary is just the file
/// name, never parsed content (in-progress logs are left alone).
pub fn live_session_entry(path: &Path) -> SessionEntry {
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

/// Reads and parses one archived session file and derives its summary, with
/// the file name as fallback when no request marker is found.
pub fn summarize_session_file(path: &Path) -> Result<SessionEntry, SummarizeError> {
    let metadata = fs::metadata(path)
        .map_err(|error| SummarizeError::ReadFile(format!("{}: {error}", path.display())))?;
    let content = fs::read_to_string(path)
        .map_err(|error| SummarizeError::ReadFile(format!("{}: {error}", path.display())))?;

    let records = parse_records(&content).map_err(|source| SummarizeError::MalformedRecord {
        path: path.display().to_string(),
        source,
    })?;

    let name = file_display_name(path);
    let summary = extract_summary(&records, &name);

    Ok(SessionEntry {
        name,
        path: path.to_path_buf(),
        summary,
        file_size_bytes: metadata.len(),
        file_modified: metadata.modified().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn walk_collects_nested_jsonl_and_ignores_other_files() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("a");
        fs::create_dir_all(&nested).expect("create");
        fs::write(nested.join("b.jsonl"), "{}\n").expect("write");
        fs::write(dir.path().join("c.txt"), "not a session").expect("write");

        let output = walk_jsonl_files(dir.path()).expect("walk");
        assert_eq!(output.files, vec![nested.join("b.jsonl")]);
        assert_eq!(output.warnings.get(), 0);
    }

    #[test]
    fn walk_fails_on_missing_root() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        assert!(walk_jsonl_files(&missing).is_err());
    }

    #[test]
    fn list_files_is_single_level_and_files_only() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("sub")).expect("create");
        fs::write(dir.path().join("sub").join("deep.jsonl"), "{}\n").expect("write");
        fs::write(dir.path().join("top.jsonl"), "{}\n").expect("write");

        let files = list_files(dir.path()).expect("list");
        assert_eq!(files, vec![dir.path().join("top.jsonl")]);
    }

    #[test]
    fn summarizes_archived_file_from_request_marker() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("s.jsonl");
        fs::write(
            &path,
            r#"{"type":"event_msg","payload":{"type":"user_message","message":"prefix My request for Codex: the actual ask"}}"#,
        )
        .expect("write");

        let entry = summarize_session_file(&path).expect("summarize");
        assert_eq!(entry.name, "s.jsonl");
        assert_eq!(entry.summary, "the actual ask");
        assert!(entry.file_size_bytes > 0);
    }

    #[test]
    fn summary_falls_back_to_file_name() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("s.jsonl");
        fs::write(&path, r#"{"type":"session_meta","payload":{"id":"x"}}"#).expect("write");

        let entry = summarize_session_file(&path).expect("summarize");
        assert_eq!(entry.summary, "s.jsonl");
    }

    #[test]
    fn malformed_record_fails_strict_summarization() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("s.jsonl");
        fs::write(&path, "{\"type\":\"event_msg\"}\nnot json\n").expect("write");

        let error = summarize_session_file(&path).expect_err("must fail");
        assert!(matches!(error, SummarizeError::MalformedRecord { .. }));
    }
}
