//! The operations exposed to the hosting shell.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::Result;
use crate::config::Settings;
use crate::error::PluginError;
use crate::events::{EventSink, PluginEvent};
use crate::host::Host;
use crate::library::{AudioFile, Scanner};
use crate::pick::{ChooserOutcome, PickHandle, PickRegistry, PickResponse, PickState, RequestId};
use crate::provider::DocumentProvider;
use crate::resolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResponse {
    pub files: Vec<AudioFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadRequest {
    pub path: Option<PathBuf>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileBytes {
    /// Base64 (standard alphabet, no line wrapping).
    pub data: String,
    /// Raw byte length before encoding.
    pub size: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EchoRequest {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoResponse {
    pub message: String,
}

pub struct LocalMusic {
    settings: Settings,
    scanner: Scanner,
    host: Arc<dyn Host>,
    provider: Arc<dyn DocumentProvider>,
    events: Arc<dyn EventSink>,
    picks: PickRegistry,
}

impl LocalMusic {
    pub fn new(
        settings: Settings,
        host: Arc<dyn Host>,
        provider: Arc<dyn DocumentProvider>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let scanner = Scanner::new(&settings.library);
        Self {
            settings,
            scanner,
            host,
            provider,
            events,
            picks: PickRegistry::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scan the public music directory.
    pub fn scan_music_directory(&self) -> Result<ScanResponse> {
        let dir = self.settings.library.music_dir(&self.settings.storage);
        if !dir.exists() {
            return Err(PluginError::MusicDirNotFound(dir));
        }

        let result = self
            .scanner
            .scan_path(&dir, self.events.as_ref())
            .map_err(|e| {
                error!(dir = %dir.display(), "error scanning directory: {e}");
                PluginError::Scan(e.to_string())
            })?;
        info!(dir = %dir.display(), count = result.count(), "music directory scanned");
        Ok(ScanResponse {
            files: result.files,
        })
    }

    /// Start an interactive folder pick.
    ///
    /// Returns immediately; the handle resolves once the host reports the
    /// chooser outcome through [`LocalMusic::complete_pick`].
    pub fn pick_music_folder(&self) -> Result<PickHandle> {
        let handle = self.picks.begin()?;
        debug!(id = %handle.id(), "launching folder chooser");

        if let Err(e) = self.host.launch_folder_chooser(handle.id()) {
            warn!(id = %handle.id(), "folder chooser failed to launch: {e}");
            let _ = self
                .picks
                .finish(handle.id(), Err(PluginError::ChooserUnavailable(e.clone())));
            return Err(PluginError::ChooserUnavailable(e));
        }
        Ok(handle)
    }

    pub fn pick_state(&self, id: RequestId) -> PickState {
        self.picks.state(id)
    }

    /// Process the chooser outcome for `id` and resolve its handle.
    ///
    /// The returned error only reports an unknown or already finished
    /// request; scan failures go to the pick's handle.
    pub fn complete_pick(&self, id: RequestId, outcome: ChooserOutcome) -> Result<()> {
        let tree_uri = match outcome {
            ChooserOutcome::Selected(uri) => uri,
            ChooserOutcome::Cancelled => {
                info!(%id, "folder selection cancelled");
                return self.picks.finish(id, Err(PluginError::Cancelled));
            }
        };

        self.picks.advance(id, PickState::Resolving)?;
        debug!(%id, uri = %tree_uri, "folder selected");
        self.events.notify(PluginEvent::ScanStarted {
            uri: tree_uri.clone(),
        });

        if let Err(e) = self.host.take_persistable_grant(&tree_uri) {
            warn!(uri = %tree_uri, "could not take persistable permission: {e}");
        }

        let outcome = self.scan_picked(id, &tree_uri);
        match &outcome {
            Ok(response) => {
                let count = response.files().len();
                info!(%id, count, "picked folder scanned");
                self.events.notify(PluginEvent::ScanCompleted { count });
            }
            Err(e) => error!(%id, "error processing folder selection: {e}"),
        }
        self.picks.finish(id, outcome)
    }

    fn scan_picked(&self, id: RequestId, tree_uri: &str) -> Result<PickResponse> {
        if let Some(path) = resolver::resolve_path(tree_uri, &self.settings.storage) {
            if path.is_dir() {
                self.picks.advance(id, PickState::Scanning)?;
                let result = self
                    .scanner
                    .scan_path(&path, self.events.as_ref())
                    .map_err(|e| PluginError::Pick(e.to_string()))?;
                return Ok(PickResponse::Path {
                    files: result.files,
                    path,
                });
            }
            debug!(path = %path.display(), "resolved path is not a directory, walking the document tree");
        }

        let root = match self.provider.open_tree(tree_uri) {
            Ok(Some(root)) if root.is_dir() => root,
            Ok(_) => return Err(PluginError::FolderInaccessible(tree_uri.to_string())),
            Err(e) => return Err(PluginError::Pick(e.to_string())),
        };

        self.picks.advance(id, PickState::Scanning)?;
        let result = self
            .scanner
            .scan_tree(self.provider.as_ref(), &root, self.events.as_ref());
        let count = result.count();
        Ok(PickResponse::Tree {
            files: result.files,
            uri: tree_uri.to_string(),
            count,
        })
    }

    /// Read a whole file, by path or by document uri, as base64.
    ///
    /// `path` wins when both are given.
    pub fn read_file_bytes(&self, request: &ReadRequest) -> Result<FileBytes> {
        let bytes = match (&request.path, &request.uri) {
            (Some(path), _) => read_path(path)?,
            (None, Some(uri)) => self.read_uri(uri)?,
            (None, None) => return Err(PluginError::MissingLocation),
        };

        Ok(FileBytes {
            data: STANDARD.encode(&bytes),
            size: bytes.len(),
        })
    }

    fn read_uri(&self, uri: &str) -> Result<Vec<u8>> {
        let mut reader = match self.provider.open_read(uri) {
            Ok(Some(reader)) => reader,
            Ok(None) => return Err(PluginError::UnopenableUri(uri.to_string())),
            Err(e) => {
                error!(uri, "error reading file: {e}");
                return Err(PluginError::Read(e.to_string()));
            }
        };
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| {
            warn!(uri, "stream ended with an error: {e}");
            PluginError::Unreadable
        })?;
        Ok(bytes)
    }

    pub fn echo(&self, request: &EchoRequest) -> EchoResponse {
        let message = request
            .message
            .clone()
            .unwrap_or_else(|| "ping".to_string());
        debug!(message = %message, "echo called");
        EchoResponse { message }
    }
}

fn read_path(path: &std::path::Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(PluginError::FileNotFound(path.to_path_buf()));
    }
    let mut file = fs::File::open(path).map_err(|e| {
        error!(path = %path.display(), "error reading file: {e}");
        PluginError::Read(e.to_string())
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| {
        warn!(path = %path.display(), "read ended with an error: {e}");
        PluginError::Unreadable
    })?;
    Ok(bytes)
}
