use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Document, DocumentKind, DocumentProvider, DocumentReader};
use crate::error::ProviderError;
use crate::resolver::{file_uri_path, path_to_file_uri};

/// Serves `file://` document identifiers straight from the filesystem.
#[derive(Debug, Default, Clone)]
pub struct FsDocumentProvider;

impl FsDocumentProvider {
    pub fn new() -> Self {
        Self
    }

    fn path_of(uri: &str) -> Result<PathBuf, ProviderError> {
        file_uri_path(uri).ok_or_else(|| ProviderError::Unsupported(uri.to_string()))
    }

    fn kind_of(path: &Path) -> DocumentKind {
        match fs::metadata(path) {
            Ok(m) if m.is_dir() => DocumentKind::Directory,
            Ok(m) if m.is_file() => DocumentKind::File,
            _ => DocumentKind::Other,
        }
    }

    /// Symlinked files are served; symlinked directories are not descended,
    /// so a link back to an ancestor cannot loop a tree walk.
    fn child_kind(path: &Path) -> DocumentKind {
        match fs::symlink_metadata(path) {
            Ok(m) if m.file_type().is_symlink() => match Self::kind_of(path) {
                DocumentKind::File => DocumentKind::File,
                _ => DocumentKind::Other,
            },
            Ok(_) => Self::kind_of(path),
            Err(_) => DocumentKind::Other,
        }
    }

    fn document_for(path: PathBuf, kind: DocumentKind) -> Document {
        Document {
            uri: path_to_file_uri(&path),
            name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            kind,
        }
    }
}

impl DocumentProvider for FsDocumentProvider {
    fn open_tree(&self, tree_uri: &str) -> Result<Option<Document>, ProviderError> {
        let Some(path) = file_uri_path(tree_uri) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let kind = Self::kind_of(&path);
        let mut doc = Self::document_for(path, kind);
        // Keep the caller's identifier for the root so results echo it back.
        doc.uri = tree_uri.to_string();
        Ok(Some(doc))
    }

    fn list_children(&self, dir: &Document) -> Result<Vec<Document>, ProviderError> {
        let path = Self::path_of(&dir.uri)?;
        let mut children = Vec::new();
        for entry in fs::read_dir(&path)? {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let kind = Self::child_kind(&path);
                    children.push(Self::document_for(path, kind));
                }
                Err(e) => debug!(dir = %path.display(), "skipping unreadable entry: {e}"),
            }
        }
        Ok(children)
    }

    fn length(&self, doc: &Document) -> Result<u64, ProviderError> {
        let path = Self::path_of(&doc.uri)?;
        Ok(fs::metadata(path)?.len())
    }

    fn open_read(&self, uri: &str) -> Result<Option<DocumentReader>, ProviderError> {
        let path = Self::path_of(uri)?;
        match fs::File::open(&path) {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProviderError::NotFound(uri.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(ProviderError::PermissionDenied(uri.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn open_tree_accepts_existing_directories_only() {
        let dir = tempdir().unwrap();
        let provider = FsDocumentProvider::new();

        let uri = path_to_file_uri(dir.path());
        let root = provider.open_tree(&uri).unwrap().unwrap();
        assert!(root.is_dir());
        assert_eq!(root.uri, uri);

        let missing = path_to_file_uri(&dir.path().join("nope"));
        assert!(provider.open_tree(&missing).unwrap().is_none());
        assert!(provider.open_tree("content://x/tree/primary%3A").unwrap().is_none());
    }

    #[test]
    fn list_children_reports_kinds_names_and_lengths() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.mp3"), b"12345").unwrap();

        let provider = FsDocumentProvider::new();
        let root = provider
            .open_tree(&path_to_file_uri(dir.path()))
            .unwrap()
            .unwrap();
        let mut children = provider.list_children(&root).unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name.as_deref(), Some("a.mp3"));
        assert_eq!(children[0].kind, DocumentKind::File);
        assert_eq!(provider.length(&children[0]).unwrap(), 5);
        assert_eq!(children[1].name.as_deref(), Some("sub"));
        assert_eq!(children[1].kind, DocumentKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_walked() {
        use crate::config::LibrarySettings;
        use crate::events::testing::RecordingSink;
        use crate::library::Scanner;
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let album = dir.path().join("album");
        fs::create_dir(&album).unwrap();
        fs::write(album.join("song.mp3"), b"x").unwrap();
        symlink(dir.path(), album.join("loop")).unwrap();
        symlink(album.join("song.mp3"), dir.path().join("alias.mp3")).unwrap();

        let provider = FsDocumentProvider::new();
        let root = provider
            .open_tree(&path_to_file_uri(dir.path()))
            .unwrap()
            .unwrap();

        let scanner = Scanner::new(&LibrarySettings::default());
        let result = scanner.scan_tree(&provider, &root, &RecordingSink::default());
        let mut names: Vec<&str> = result.files.iter().map(|f| f.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["alias.mp3", "song.mp3"]);

        let album_doc = provider
            .list_children(&root)
            .unwrap()
            .into_iter()
            .find(|d| d.name.as_deref() == Some("album"))
            .unwrap();
        let link = provider
            .list_children(&album_doc)
            .unwrap()
            .into_iter()
            .find(|d| d.name.as_deref() == Some("loop"))
            .unwrap();
        assert_eq!(link.kind, DocumentKind::Other);
    }

    #[test]
    fn open_read_streams_file_contents() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("x y.wav");
        fs::write(&file, b"RIFF").unwrap();

        let provider = FsDocumentProvider::new();
        let mut reader = provider
            .open_read(&path_to_file_uri(&file))
            .unwrap()
            .unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"RIFF");

        let missing = path_to_file_uri(&dir.path().join("gone.wav"));
        assert!(matches!(
            provider.open_read(&missing),
            Err(ProviderError::NotFound(_))
        ));
        assert!(matches!(
            provider.open_read("content://auth/document/1"),
            Err(ProviderError::Unsupported(_))
        ));
    }
}
