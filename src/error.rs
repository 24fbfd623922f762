use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`PluginError`], for callers that branch on
/// the failure class rather than the message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    UnresolvableLocation,
    MalformedInput,
    /// A subtree that failed during a walk. Recovered inside the scan and
    /// never the kind of a returned error.
    PartialFailure,
    Cancelled,
    Busy,
}

/// Errors surfaced to the hosting shell. The `Display` text is what the
/// shell sees as the rejection message.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Music directory not found")]
    MusicDirNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unable to open uri: {0}")]
    UnopenableUri(String),

    #[error("Unable to read file bytes")]
    Unreadable,

    #[error("Error reading file: {0}")]
    Read(String),

    #[error("Path or uri is required")]
    MissingLocation,

    #[error("Could not access selected folder")]
    FolderInaccessible(String),

    #[error("Error scanning directory: {0}")]
    Scan(String),

    #[error("Error: {0}")]
    Pick(String),

    #[error("User cancelled folder selection")]
    Cancelled,

    #[error("A folder pick is already in progress")]
    PickInFlight,

    #[error("Unknown pick request: {0}")]
    UnknownRequest(uuid::Uuid),

    #[error("Folder chooser unavailable: {0}")]
    ChooserUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MusicDirNotFound(_) | Self::FileNotFound(_) => ErrorKind::NotFound,
            Self::UnopenableUri(_)
            | Self::Unreadable
            | Self::Read(_)
            | Self::ChooserUnavailable(_)
            | Self::Scan(_)
            | Self::Pick(_) => ErrorKind::AccessDenied,
            Self::FolderInaccessible(_) => ErrorKind::UnresolvableLocation,
            Self::MissingLocation | Self::UnknownRequest(_) => ErrorKind::MalformedInput,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::PickInFlight => ErrorKind::Busy,
            Self::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::AccessDenied,
            },
        }
    }
}

/// Failures reported by a [`crate::provider::DocumentProvider`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("unsupported uri: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
