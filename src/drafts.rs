use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use itertools::Itertools;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

const FILE_PREFIX: &str = "freewrite_";
const TIMESTAMP_FMT: &str = "%Y%m%d-%H%M%S";
const PREVIEW_CHARS: usize = 100;

/// One entry in the draft history, newest first
#[derive(Debug, Clone)]
pub struct DraftMeta {
    pub path: PathBuf,
    pub file_name: String,
    /// Creation time parsed from the filename; None for foreign files
    /// that were dropped into the drafts directory.
    pub created: Option<DateTime<Local>>,
    pub word_count: usize,
    pub preview: String,
}

/// Filesystem-backed store of timestamped plain-text snapshots.
///
/// Snapshots are append-only: every autosave writes a new
/// `freewrite_YYYYMMDD-HHMMSS.txt` file and nothing here ever deletes
/// one. Explicit saves go to a caller-chosen path and may overwrite.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn default_location() -> Self {
        Self::new(AppDirs::drafts_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a new snapshot named after `now` with second resolution.
    /// A same-second collision never overwrites: the name is
    /// disambiguated with a deterministic `_2`, `_3`, ... suffix.
    pub fn persist_snapshot(&self, text: &str, now: DateTime<Local>) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let stamp = now.format(TIMESTAMP_FMT).to_string();
        let mut path = self.dir.join(format!("{}{}.txt", FILE_PREFIX, stamp));
        let mut n = 2u32;
        while path.exists() {
            path = self.dir.join(format!("{}{}_{}.txt", FILE_PREFIX, stamp, n));
            n += 1;
        }
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Explicit save to a user-chosen path. Overwriting is allowed
    /// here, unlike snapshots.
    pub fn save_to<P: AsRef<Path>>(&self, path: P, text: &str) -> io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)
    }

    /// All `.txt` drafts, newest first (filename order is timestamp
    /// order). A missing directory is an empty history, not an error.
    pub fn list(&self) -> io::Result<Vec<DraftMeta>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e),
        };

        let drafts = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|n| n.ends_with(".txt"))
            })
            .filter_map(|entry| {
                let path = entry.path();
                let file_name = entry.file_name().to_string_lossy().into_owned();
                let content = fs::read_to_string(&path).ok()?;
                Some(DraftMeta {
                    created: parse_created(&file_name),
                    word_count: content.split_whitespace().count(),
                    preview: make_preview(&content),
                    path,
                    file_name,
                })
            })
            .sorted_by(|a, b| b.file_name.cmp(&a.file_name))
            .collect();

        Ok(drafts)
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Extract the creation timestamp from `freewrite_YYYYMMDD-HHMMSS*.txt`
fn parse_created(file_name: &str) -> Option<DateTime<Local>> {
    let rest = file_name.strip_prefix(FILE_PREFIX)?;
    let stamp: String = rest.chars().take(15).collect();
    let naive = NaiveDateTime::parse_from_str(&stamp, TIMESTAMP_FMT).ok()?;
    Local.from_local_datetime(&naive).single()
}

fn make_preview(content: &str) -> String {
    let flat = content.split_whitespace().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
