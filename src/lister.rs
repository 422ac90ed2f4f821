//! Directory enumeration
//!
//! Turns one target path into a [`Listing`]: the synthetic `.` and `..`
//! entries followed by the directory's own entries in directory order.
//! Metadata comes from a [`MetadataProvider`]; [`FsProvider`] reads the real
//! filesystem through `std::fs`, with owner and group names looked up through
//! libc on Unix.

use crate::record::{FileMode, FileRecord};
use crate::{Error, Result};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[cfg(not(unix))]
use crate::record::Triad;
#[cfg(unix)]
use std::ffi::CStr;
#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Source of ready-made entry records
pub trait MetadataProvider {
    /// Record for a single path; symlinks are reported as links
    fn stat(&self, path: &Path) -> Result<FileRecord>;

    /// Child paths of a directory in directory order
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Canonical form of a path, used to detect revisits
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
}

/// The entries of one requested path plus its display header
#[derive(Debug, Clone)]
pub struct Listing {
    /// Base name of the listed path
    pub header: String,
    /// The listed path
    pub path: PathBuf,
    pub entries: Vec<FileRecord>,
}

/// Base name used for headers and for the directory-only entry
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Enumerate one target
///
/// Directories yield `.`, `..`, then their children. A target that is not a
/// directory yields just its own record.
pub fn enumerate(provider: &dyn MetadataProvider, path: &Path) -> Result<Listing> {
    log::debug!("Enumerating {:?}", path);
    let header = base_name(path);
    let target = provider.stat(path)?;

    if !target.is_dir {
        return Ok(Listing {
            header: header.clone(),
            path: path.to_path_buf(),
            entries: vec![target.renamed(header)],
        });
    }

    let parent = path.parent().unwrap_or(path);
    let mut entries = vec![target.renamed("."), provider.stat(parent)?.renamed("..")];

    for child in provider.read_dir(path)? {
        entries.push(provider.stat(&child)?);
    }

    Ok(Listing {
        header,
        path: path.to_path_buf(),
        entries,
    })
}

/// The single entry shown in directory-only mode
pub fn directory_entry(provider: &dyn MetadataProvider, path: &Path) -> Result<FileRecord> {
    Ok(provider.stat(path)?.renamed(base_name(path)))
}

/// Replace symlink entries with their target's metadata, keeping the link's name
pub fn dereference(
    provider: &dyn MetadataProvider,
    entries: Vec<FileRecord>,
) -> Result<Vec<FileRecord>> {
    entries
        .into_iter()
        .map(|entry| {
            if entry.is_symlink {
                if let Some(target) = &entry.link_target {
                    let resolved = provider.stat(target)?;
                    return Ok(resolved.renamed(entry.name));
                }
            }
            Ok(entry)
        })
        .collect()
}

/// Metadata provider backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProvider;

impl MetadataProvider for FsProvider {
    fn stat(&self, path: &Path) -> Result<FileRecord> {
        let link_meta = fs::symlink_metadata(path).map_err(|e| not_found_or_io(e, path))?;
        let is_symlink = link_meta.file_type().is_symlink();

        // Broken links fall back to the link's own metadata
        let meta = if is_symlink {
            fs::metadata(path).unwrap_or_else(|_| link_meta.clone())
        } else {
            link_meta
        };

        let link_target = if is_symlink {
            fs::canonicalize(path).ok()
        } else {
            None
        };

        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let accessed = meta.accessed().unwrap_or(modified);
        let (owner, group) = owner_and_group(&meta);

        Ok(FileRecord {
            name: base_name(path),
            path: path.to_path_buf(),
            size: meta.len(),
            is_dir: meta.is_dir(),
            is_symlink,
            link_target,
            is_executable: is_executable(path, &meta),
            modified,
            accessed,
            owner,
            group,
            mode: file_mode(&meta),
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| not_found_or_io(e, path))? {
            children.push(entry?.path());
        }
        // Directory order is name order so listings are reproducible
        children.sort();
        Ok(children)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| not_found_or_io(e, path))
    }
}

fn not_found_or_io(err: io::Error, path: &Path) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::not_found(path)
    } else {
        Error::IoError(err)
    }
}

#[cfg(unix)]
fn file_mode(meta: &Metadata) -> FileMode {
    FileMode::from_unix(meta.mode())
}

#[cfg(not(unix))]
fn file_mode(meta: &Metadata) -> FileMode {
    let writable = !meta.permissions().readonly();
    FileMode::owner_only(Triad::new(true, writable, meta.is_dir()))
}

/// Check if file is executable
#[cfg(unix)]
fn is_executable(_path: &Path, meta: &Metadata) -> bool {
    !meta.is_dir() && meta.mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path, meta: &Metadata) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !meta.is_dir() && matches!(ext.as_str(), "exe" | "bat" | "cmd" | "com")
}

#[cfg(unix)]
fn owner_and_group(meta: &Metadata) -> (String, String) {
    (user_name(meta.uid()), group_name(meta.gid()))
}

#[cfg(not(unix))]
fn owner_and_group(_meta: &Metadata) -> (String, String) {
    ("SYSTEM".to_string(), "SYSTEM".to_string())
}

#[cfg(unix)]
const NAME_BUFFER_LEN: usize = 16 * 1024;

/// Look up a user name, falling back to the numeric id
#[cfg(unix)]
fn user_name(uid: u32) -> String {
    let mut buf = vec![0 as libc::c_char; NAME_BUFFER_LEN];
    let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::passwd = std::ptr::null_mut();

    let rc = unsafe { libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result) };
    if rc == 0 && !result.is_null() && !pwd.pw_name.is_null() {
        unsafe { CStr::from_ptr(pwd.pw_name) }.to_string_lossy().into_owned()
    } else {
        uid.to_string()
    }
}

/// Look up a group name, falling back to the numeric id
#[cfg(unix)]
fn group_name(gid: u32) -> String {
    let mut buf = vec![0 as libc::c_char; NAME_BUFFER_LEN];
    let mut grp: libc::group = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::group = std::ptr::null_mut();

    let rc = unsafe { libc::getgrgid_r(gid, &mut grp, buf.as_mut_ptr(), buf.len(), &mut result) };
    if rc == 0 && !result.is_null() && !grp.gr_name.is_null() {
        unsafe { CStr::from_ptr(grp.gr_name) }.to_string_lossy().into_owned()
    } else {
        gid.to_string()
    }
}
