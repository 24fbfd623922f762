//! Document-provider seam: the virtual tree behind a granted folder.
//!
//! On a device this is backed by the platform's document provider. The
//! filesystem implementation serves `file://` identifiers for desktop hosts.

use std::io::Read;

use crate::error::ProviderError;

mod fs;
#[cfg(test)]
pub(crate) mod memory;

pub use fs::FsDocumentProvider;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Directory,
    File,
    /// Virtual or otherwise unsupported documents; never scanned.
    Other,
}

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub uri: String,
    /// Display name; providers may fail to report one.
    pub name: Option<String>,
    pub kind: DocumentKind,
}

impl Document {
    pub fn is_dir(&self) -> bool {
        self.kind == DocumentKind::Directory
    }
}

pub type DocumentReader = Box<dyn Read + Send>;

pub trait DocumentProvider: Send + Sync {
    /// Open the root of a granted tree. `Ok(None)` when the identifier does
    /// not name a tree this provider can serve.
    fn open_tree(&self, tree_uri: &str) -> Result<Option<Document>, ProviderError>;

    /// Children of `dir`, in whatever order the provider lists them.
    fn list_children(&self, dir: &Document) -> Result<Vec<Document>, ProviderError>;

    /// Byte length of a file document.
    fn length(&self, doc: &Document) -> Result<u64, ProviderError>;

    /// Open a document for reading. `Ok(None)` when the provider has no
    /// stream for the identifier.
    fn open_read(&self, uri: &str) -> Result<Option<DocumentReader>, ProviderError>;
}
