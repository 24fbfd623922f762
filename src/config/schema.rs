use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/local-music/config.toml` or `~/.config/local-music/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LOCAL_MUSIC__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during direct scans.
    pub follow_links: bool,
    /// Emit a `scanProgress` event every this many matches.
    pub progress_interval: usize,
    /// Overrides the public music directory used by `scanMusicDirectory`.
    pub music_dir: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["flac", "mp3", "m4a", "wav", "aac"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            progress_interval: 50,
            music_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Mount point of the primary (internal) shared storage volume.
    pub external_storage_root: PathBuf,
    /// Parent directory under which secondary volumes are mounted by id.
    pub volume_root: PathBuf,
    /// Name of the public music directory below `external_storage_root`.
    pub music_dir_name: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            external_storage_root: PathBuf::from("/storage/emulated/0"),
            volume_root: PathBuf::from("/storage"),
            music_dir_name: "Music".to_string(),
        }
    }
}

impl LibrarySettings {
    /// The directory scanned by `scanMusicDirectory`.
    pub fn music_dir(&self, storage: &StorageSettings) -> PathBuf {
        self.music_dir
            .clone()
            .unwrap_or_else(|| storage.external_storage_root.join(&storage.music_dir_name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    Error,
    #[serde(alias = "warning")]
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
