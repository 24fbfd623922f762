use crate::config::LibrarySettings;

/// Extension matcher shared by both scan modes.
#[derive(Debug, Clone)]
pub struct AudioFilter {
    extensions: Vec<String>,
}

impl AudioFilter {
    pub fn new(settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    /// Whether a file name carries one of the configured extensions.
    ///
    /// The extension is whatever follows the last `.`, so `.mp3` on its own
    /// counts as an mp3.
    pub fn matches(&self, name: &str) -> bool {
        name.rsplit_once('.')
            .map(|(_, ext)| {
                let ext = ext.to_ascii_lowercase();
                !ext.is_empty() && self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }
}

/// Directories whose name starts with `.` are pruned. Files are never hidden.
pub fn is_hidden_dir_name(name: &str) -> bool {
    name.starts_with('.')
}
