//! Best-effort translation of document-tree identifiers into filesystem paths.
//!
//! Content providers do not promise any relationship between a document id
//! and an on-disk location. The mapping here follows the external storage
//! provider's `<volume>:<relative path>` convention. Anything that does not fit
//! it resolves to `None`, and callers fall back to walking the document tree.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::StorageSettings;

const PRIMARY_VOLUME: &str = "primary";

/// The pieces of a `scheme://authority/path` identifier. `path` keeps its
/// percent-encoding.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedUri<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub path: &'a str,
}

pub(crate) fn parse_uri(uri: &str) -> Option<ParsedUri<'_>> {
    let (scheme, rest) = uri.split_once(':')?;
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }

    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let (authority, path) = match rest.strip_prefix("//") {
        Some(after) => match after.find('/') {
            Some(idx) => (&after[..idx], &after[idx..]),
            None => (after, ""),
        },
        None => ("", rest),
    };

    Some(ParsedUri {
        scheme,
        authority,
        path,
    })
}

fn decoded_segments(path: &str) -> Option<Vec<Cow<'_, str>>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).ok())
        .collect()
}

/// Extract the provider document id from a `content://` uri.
///
/// Document uris (`/document/<id>` or `/tree/<t>/document/<id>`) yield the
/// document id; bare tree uris (`/tree/<id>`) yield the tree's root id.
/// The platform's document-id lookup rejects bare tree uris, so resolving
/// them here is an extra fast path; callers still fall back to the tree walk
/// when the derived path is not a directory.
pub fn document_id(uri: &str) -> Option<String> {
    let parsed = parse_uri(uri)?;
    if !parsed.scheme.eq_ignore_ascii_case("content") {
        return None;
    }
    let segments = decoded_segments(parsed.path)?;

    match segments.as_slice() {
        [doc, id, ..] if doc == "document" => Some(id.to_string()),
        [tree, _, doc, id, ..] if tree == "tree" && doc == "document" => Some(id.to_string()),
        [tree, id, ..] if tree == "tree" => Some(id.to_string()),
        _ => None,
    }
}

/// Path component of a `file://` uri, percent-decoded.
pub fn file_uri_path(uri: &str) -> Option<PathBuf> {
    let parsed = parse_uri(uri)?;
    if !parsed.scheme.eq_ignore_ascii_case("file") || parsed.path.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(parsed.path).ok()?;
    Some(PathBuf::from(decoded.into_owned()))
}

/// Build a `file://` uri for an absolute path, percent-encoding each segment.
pub fn path_to_file_uri(path: &Path) -> String {
    let encoded: Vec<String> = path
        .to_string_lossy()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("file://{}", encoded.join("/"))
}

/// Map a `<volume>:<relative>` document id onto the mounted volume layout.
pub fn document_id_to_path(doc_id: &str, storage: &StorageSettings) -> Option<PathBuf> {
    let (volume, relative) = doc_id.split_once(':')?;
    if volume.is_empty() {
        return None;
    }

    let base = if volume == PRIMARY_VOLUME {
        storage.external_storage_root.clone()
    } else {
        storage.volume_root.join(volume)
    };

    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        Some(base)
    } else {
        Some(base.join(relative))
    }
}

/// Translate a tree or document identifier into a plain filesystem path.
///
/// Returns `None` when no path can be derived; that is an expected outcome,
/// not an error.
pub fn resolve_path(uri: &str, storage: &StorageSettings) -> Option<PathBuf> {
    let parsed = parse_uri(uri)?;

    let resolved = if parsed.scheme.eq_ignore_ascii_case("file") {
        file_uri_path(uri)
    } else if parsed.scheme.eq_ignore_ascii_case("content") {
        document_id(uri).and_then(|id| document_id_to_path(&id, storage))
    } else {
        None
    };

    debug!(uri, resolved = ?resolved, "resolved tree uri");
    resolved
}
