use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;
use crate::events::EventSink;

use super::filter::AudioFilter;
use super::model::{AudioFile, Location, ScanResult};
use super::progress::ProgressCounter;

/// Recursive audio file discovery over a directory or a document tree.
///
/// A scanner is stateless between calls: each scan counts its own matches
/// from zero.
#[derive(Debug, Clone)]
pub struct Scanner {
    pub(super) filter: AudioFilter,
    follow_links: bool,
    pub(super) progress_interval: usize,
}

// Checked on raw bytes so names that are not valid UTF-8 are pruned too.
fn is_pruned(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().as_encoded_bytes().starts_with(b".")
}

fn modified_millis(metadata: &std::fs::Metadata) -> Option<i64> {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
}

impl Scanner {
    pub fn new(settings: &LibrarySettings) -> Self {
        Self {
            filter: AudioFilter::new(settings),
            follow_links: settings.follow_links,
            progress_interval: settings.progress_interval,
        }
    }

    /// Walk `root` depth-first and collect audio files with their absolute
    /// paths.
    ///
    /// Only a missing root is an error. Unreadable subdirectories are logged
    /// and skipped, and their siblings are still visited.
    pub fn scan_path(&self, root: &Path, events: &dyn EventSink) -> io::Result<ScanResult> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", root.display()),
            ));
        }
        let root = std::path::absolute(root)?;

        let mut progress = ProgressCounter::new(self.progress_interval, events);
        let mut files: Vec<AudioFile> = Vec::new();

        let walker = WalkDir::new(&root).follow_links(self.follow_links);
        for entry in walker.into_iter().filter_entry(|e| !is_pruned(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        path = ?err.path(),
                        "skipping unreadable part of {}: {err}",
                        root.display()
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.filter.matches(&name) {
                continue;
            }

            let (size, last_modified) = match entry.metadata() {
                Ok(m) => (Some(m.len()), modified_millis(&m)),
                Err(err) => {
                    warn!(path = %entry.path().display(), "no metadata for audio file: {err}");
                    (None, None)
                }
            };

            debug!(name = %name, "found audio file");
            files.push(AudioFile {
                name: name.into_owned(),
                location: Location::Path(entry.path().to_path_buf()),
                size,
                last_modified,
            });
            progress.record_match();
        }

        Ok(ScanResult {
            root: Location::Path(root),
            files,
        })
    }
}
