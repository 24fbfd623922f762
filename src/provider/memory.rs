//! In-memory document tree used as a test double for a platform provider.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::Mutex;

use super::{Document, DocumentKind, DocumentProvider, DocumentReader};
use crate::error::ProviderError;

struct Node {
    doc: Document,
    children: Vec<String>,
    bytes: Vec<u8>,
    length_fails: bool,
    listing_fails: bool,
    open_fails: bool,
    read_fails: bool,
}

/// Errors on every read; chained after real bytes to break a stream midway.
struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream reset"))
    }
}

#[derive(Default)]
pub struct MemoryProvider {
    nodes: Mutex<HashMap<String, Node>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, parent: Option<&str>, doc: Document, bytes: Vec<u8>) {
        let mut nodes = self.nodes.lock().unwrap();
        if let Some(parent) = parent {
            nodes
                .get_mut(parent)
                .expect("parent must be added first")
                .children
                .push(doc.uri.clone());
        }
        nodes.insert(
            doc.uri.clone(),
            Node {
                doc,
                children: Vec::new(),
                bytes,
                length_fails: false,
                listing_fails: false,
                open_fails: false,
                read_fails: false,
            },
        );
    }

    pub fn add_root(&self, uri: &str) {
        self.insert(
            None,
            Document {
                uri: uri.to_string(),
                name: Some("root".to_string()),
                kind: DocumentKind::Directory,
            },
            Vec::new(),
        );
    }

    pub fn add_dir(&self, parent: &str, uri: &str, name: Option<&str>) {
        self.insert(
            Some(parent),
            Document {
                uri: uri.to_string(),
                name: name.map(str::to_string),
                kind: DocumentKind::Directory,
            },
            Vec::new(),
        );
    }

    pub fn add_file(&self, parent: &str, uri: &str, name: Option<&str>, bytes: &[u8]) {
        self.insert(
            Some(parent),
            Document {
                uri: uri.to_string(),
                name: name.map(str::to_string),
                kind: DocumentKind::File,
            },
            bytes.to_vec(),
        );
    }

    pub fn fail_listing(&self, uri: &str) {
        if let Some(node) = self.nodes.lock().unwrap().get_mut(uri) {
            node.listing_fails = true;
        }
    }

    pub fn fail_length(&self, uri: &str) {
        if let Some(node) = self.nodes.lock().unwrap().get_mut(uri) {
            node.length_fails = true;
        }
    }

    pub fn fail_open(&self, uri: &str) {
        if let Some(node) = self.nodes.lock().unwrap().get_mut(uri) {
            node.open_fails = true;
        }
    }

    /// Reads of `uri` return the first half of its bytes, then fail.
    pub fn fail_reads(&self, uri: &str) {
        if let Some(node) = self.nodes.lock().unwrap().get_mut(uri) {
            node.read_fails = true;
        }
    }
}

impl DocumentProvider for MemoryProvider {
    fn open_tree(&self, tree_uri: &str) -> Result<Option<Document>, ProviderError> {
        match self.nodes.lock().unwrap().get(tree_uri) {
            Some(node) if node.open_fails => {
                Err(ProviderError::PermissionDenied(tree_uri.to_string()))
            }
            Some(node) => Ok(Some(node.doc.clone())),
            None => Ok(None),
        }
    }

    fn list_children(&self, dir: &Document) -> Result<Vec<Document>, ProviderError> {
        let nodes = self.nodes.lock().unwrap();
        let node = nodes
            .get(&dir.uri)
            .ok_or_else(|| ProviderError::NotFound(dir.uri.clone()))?;
        if node.listing_fails {
            return Err(ProviderError::PermissionDenied(dir.uri.clone()));
        }
        Ok(node
            .children
            .iter()
            .filter_map(|uri| nodes.get(uri).map(|n| n.doc.clone()))
            .collect())
    }

    fn length(&self, doc: &Document) -> Result<u64, ProviderError> {
        let nodes = self.nodes.lock().unwrap();
        let node = nodes
            .get(&doc.uri)
            .ok_or_else(|| ProviderError::NotFound(doc.uri.clone()))?;
        if node.length_fails {
            return Err(ProviderError::PermissionDenied(doc.uri.clone()));
        }
        Ok(node.bytes.len() as u64)
    }

    fn open_read(&self, uri: &str) -> Result<Option<DocumentReader>, ProviderError> {
        let nodes = self.nodes.lock().unwrap();
        let Some(node) = nodes.get(uri).filter(|n| n.doc.kind == DocumentKind::File) else {
            return Ok(None);
        };
        if node.open_fails {
            return Err(ProviderError::PermissionDenied(uri.to_string()));
        }
        let reader: DocumentReader = if node.read_fails {
            let head = node.bytes[..node.bytes.len() / 2].to_vec();
            Box::new(Cursor::new(head).chain(BrokenStream))
        } else {
            Box::new(Cursor::new(node.bytes.clone()))
        };
        Ok(Some(reader))
    }
}
