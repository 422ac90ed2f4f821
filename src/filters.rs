//! Filtering and sorting of enumerated entries
//!
//! Each step takes an owned sequence of records and returns a new one, so the
//! pipeline is a plain chain of functions: glob, backup and hidden filters,
//! one stable sort pass, reversal, then directories-first grouping.

use crate::record::{minute_key, FileRecord};
use crate::resolver::{EffectiveConfig, HiddenPolicy, SortKey};
use crate::Result;
use regex::Regex;
use std::cmp::Ordering;

/// Compile a name glob where `*` matches any sequence; the match is
/// case-sensitive and anchored to the whole name
pub fn compile_glob(pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body)).map_err(Into::into)
}

/// Keep entries whose name matches the glob
pub fn glob_filter(entries: Vec<FileRecord>, pattern: &str) -> Result<Vec<FileRecord>> {
    let regex = compile_glob(pattern)?;
    Ok(entries
        .into_iter()
        .filter(|entry| regex.is_match(&entry.name))
        .collect())
}

/// Drop entries ending with `~`
pub fn backup_filter(entries: Vec<FileRecord>) -> Vec<FileRecord> {
    entries
        .into_iter()
        .filter(|entry| !entry.name.ends_with('~'))
        .collect()
}

/// Apply the hidden-entry policy
pub fn hidden_filter(entries: Vec<FileRecord>, policy: HiddenPolicy) -> Vec<FileRecord> {
    match policy {
        HiddenPolicy::ShowAll => entries,
        HiddenPolicy::AlmostAll => entries
            .into_iter()
            .filter(|entry| entry.name != "." && entry.name != "..")
            .collect(),
        HiddenPolicy::HideDotFiles => entries
            .into_iter()
            .filter(|entry| !entry.name.starts_with('.'))
            .collect(),
    }
}

/// Comparator for one sort key
pub fn compare_entries(a: &FileRecord, b: &FileRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::DirectoryOrder => Ordering::Equal,
        SortKey::Size => display_size(b).cmp(&display_size(a)),
        SortKey::Extension => a.extension().cmp(b.extension()),
        SortKey::ModificationTime => minute_key(b.modified).cmp(&minute_key(a.modified)),
        SortKey::AccessTime => minute_key(b.accessed).cmp(&minute_key(a.accessed)),
    }
}

/// Directories sort as size zero, matching what the listing shows
fn display_size(entry: &FileRecord) -> u64 {
    if entry.is_dir {
        0
    } else {
        entry.size
    }
}

/// Stable sort by one key
pub fn sort_entries(mut entries: Vec<FileRecord>, key: SortKey) -> Vec<FileRecord> {
    if key != SortKey::DirectoryOrder {
        log::debug!("Sorting {} entries by {:?}", entries.len(), key);
        entries.sort_by(|a, b| compare_entries(a, b, key));
    }
    entries
}

pub fn reverse(mut entries: Vec<FileRecord>) -> Vec<FileRecord> {
    entries.reverse();
    entries
}

/// Stable partition: directories first, each group keeping its order
pub fn directories_first(entries: Vec<FileRecord>) -> Vec<FileRecord> {
    let (mut dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);
    dirs.extend(files);
    dirs
}

/// Run the whole filter and sort pipeline
///
/// In directory-only mode the single entry is the target itself, so the name
/// filters are skipped.
pub fn apply(entries: Vec<FileRecord>, config: &EffectiveConfig) -> Result<Vec<FileRecord>> {
    let mut entries = entries;

    if !config.directory_only {
        if let Some(pattern) = &config.glob {
            entries = glob_filter(entries, pattern)?;
        }
        if config.ignore_backups {
            entries = backup_filter(entries);
        }
        entries = hidden_filter(entries, config.hidden);
    }

    entries = sort_entries(entries, config.sort);
    if config.reverse {
        entries = reverse(entries);
    }
    if config.directories_first {
        entries = directories_first(entries);
    }

    Ok(entries)
}
