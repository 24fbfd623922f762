//! Discovery and reading of local audio files on behalf of a hosted web shell.
//!
//! Folders are reached either by plain filesystem path or through a
//! document-tree provider when the user grants a folder interactively.

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod library;
pub mod logging;
pub mod pick;
pub mod plugin;
pub mod provider;
pub mod resolver;

pub use error::{ErrorKind, PluginError, ProviderError};
pub use plugin::LocalMusic;

pub type Result<T> = std::result::Result<T, PluginError>;
