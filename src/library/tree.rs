use tracing::{debug, warn};

use crate::events::EventSink;
use crate::provider::{Document, DocumentKind, DocumentProvider};

use super::filter::is_hidden_dir_name;
use super::model::{AudioFile, Location, ScanResult};
use super::progress::ProgressCounter;
use super::scan::Scanner;

impl Scanner {
    /// Walk a document tree depth-first through `provider`.
    ///
    /// Documents without a name are skipped. Sizes are reported when the
    /// provider can produce them. A subtree whose listing fails contributes
    /// nothing, and the rest of the walk continues.
    pub fn scan_tree(
        &self,
        provider: &dyn DocumentProvider,
        root: &Document,
        events: &dyn EventSink,
    ) -> ScanResult {
        let mut progress = ProgressCounter::new(self.progress_interval, events);
        let mut files = Vec::new();
        self.walk_tree(provider, root, &mut files, &mut progress);
        ScanResult {
            root: Location::Uri(root.uri.clone()),
            files,
        }
    }

    fn walk_tree(
        &self,
        provider: &dyn DocumentProvider,
        dir: &Document,
        files: &mut Vec<AudioFile>,
        progress: &mut ProgressCounter<'_>,
    ) {
        let children = match provider.list_children(dir) {
            Ok(children) => children,
            Err(err) => {
                warn!(uri = %dir.uri, "skipping unreadable document directory: {err}");
                return;
            }
        };

        for child in children {
            match child.kind {
                DocumentKind::Directory => {
                    if child.name.as_deref().is_some_and(|n| !is_hidden_dir_name(n)) {
                        self.walk_tree(provider, &child, files, progress);
                    }
                }
                DocumentKind::File => {
                    let Some(name) = child.name.as_deref() else {
                        continue;
                    };
                    if !self.filter.matches(name) {
                        continue;
                    }
                    let size = match provider.length(&child) {
                        Ok(len) => Some(len),
                        Err(err) => {
                            debug!(uri = %child.uri, "size unavailable: {err}");
                            None
                        }
                    };
                    debug!(name, "found audio file (document tree)");
                    files.push(AudioFile {
                        name: name.to_string(),
                        location: Location::Uri(child.uri.clone()),
                        size,
                        last_modified: None,
                    });
                    progress.record_match();
                }
                DocumentKind::Other => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibrarySettings;
    use crate::events::testing::RecordingSink;
    use crate::events::PluginEvent;
    use crate::provider::memory::MemoryProvider;

    const ROOT: &str = "content://docs/tree/primary%3AMusic";

    fn doc(uri: &str) -> String {
        format!("{ROOT}/document/{uri}")
    }

    fn root_of(provider: &MemoryProvider) -> Document {
        provider.open_tree(ROOT).unwrap().unwrap()
    }

    #[test]
    fn collects_matching_files_with_uris_and_sizes() {
        let p = MemoryProvider::new();
        p.add_root(ROOT);
        p.add_file(ROOT, &doc("a"), Some("a.FLAC"), b"1234");
        p.add_file(ROOT, &doc("b"), Some("cover.jpg"), b"x");
        p.add_dir(ROOT, &doc("d"), Some("Album"));
        p.add_file(&doc("d"), &doc("c"), Some("c.mp3"), b"12");

        let scanner = Scanner::new(&LibrarySettings::default());
        let result = scanner.scan_tree(&p, &root_of(&p), &RecordingSink::default());

        assert_eq!(result.root, Location::Uri(ROOT.to_string()));
        assert_eq!(
            result.files,
            vec![
                AudioFile {
                    name: "a.FLAC".into(),
                    location: Location::Uri(doc("a")),
                    size: Some(4),
                    last_modified: None,
                },
                AudioFile {
                    name: "c.mp3".into(),
                    location: Location::Uri(doc("c")),
                    size: Some(2),
                    last_modified: None,
                },
            ]
        );
    }

    #[test]
    fn nameless_and_hidden_entries_are_skipped() {
        let p = MemoryProvider::new();
        p.add_root(ROOT);
        p.add_file(ROOT, &doc("n"), None, b"x");
        p.add_dir(ROOT, &doc("h"), Some(".thumbnails"));
        p.add_file(&doc("h"), &doc("h1"), Some("in-hidden.mp3"), b"x");
        p.add_dir(ROOT, &doc("u"), None);
        p.add_file(&doc("u"), &doc("u1"), Some("in-unnamed.mp3"), b"x");
        p.add_file(ROOT, &doc("dot"), Some(".dot.wav"), b"x");

        let scanner = Scanner::new(&LibrarySettings::default());
        let result = scanner.scan_tree(&p, &root_of(&p), &RecordingSink::default());

        let names: Vec<&str> = result.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec![".dot.wav"]);
    }

    #[test]
    fn failing_subtree_and_failing_length_are_tolerated() {
        let p = MemoryProvider::new();
        p.add_root(ROOT);
        p.add_dir(ROOT, &doc("bad"), Some("Bad"));
        p.add_file(&doc("bad"), &doc("bad1"), Some("lost.mp3"), b"x");
        p.fail_listing(&doc("bad"));
        p.add_dir(ROOT, &doc("good"), Some("Good"));
        p.add_file(&doc("good"), &doc("g1"), Some("kept.mp3"), b"xyz");
        p.fail_length(&doc("g1"));

        let scanner = Scanner::new(&LibrarySettings::default());
        let result = scanner.scan_tree(&p, &root_of(&p), &RecordingSink::default());

        assert_eq!(result.count(), 1);
        assert_eq!(result.files[0].name, "kept.mp3");
        assert_eq!(result.files[0].size, None);
    }

    #[test]
    fn progress_fires_floor_of_matches_over_interval() {
        let p = MemoryProvider::new();
        p.add_root(ROOT);
        for i in 0..130 {
            p.add_file(ROOT, &doc(&format!("f{i}")), Some(format!("{i}.aac").as_str()), b"x");
        }

        let scanner = Scanner::new(&LibrarySettings::default());
        let sink = RecordingSink::default();
        let result = scanner.scan_tree(&p, &root_of(&p), &sink);

        assert_eq!(result.count(), 130);
        assert_eq!(
            sink.events(),
            vec![
                PluginEvent::ScanProgress { count: 50 },
                PluginEvent::ScanProgress { count: 100 },
            ]
        );
    }
}
