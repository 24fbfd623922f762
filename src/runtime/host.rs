use std::io::Write;

use local_music::events::{EventSink, PluginEvent};
use local_music::host::Host;
use local_music::pick::RequestId;
use local_music::resolver::file_uri_path;
use tracing::{debug, info};

/// Command-line stand-in for the embedding activity. The chooser answer is
/// supplied on the command line, so launching it only records the request.
pub struct CliHost;

impl Host for CliHost {
    fn launch_folder_chooser(&self, request: RequestId) -> Result<(), String> {
        info!(%request, "folder chooser requested");
        Ok(())
    }

    fn take_persistable_grant(&self, tree_uri: &str) -> Result<(), String> {
        if file_uri_path(tree_uri).is_some() {
            debug!(uri = tree_uri, "file trees need no grant");
            Ok(())
        } else {
            Err(format!("no document provider grants available for {tree_uri}"))
        }
    }
}

/// Writes each event as one JSON line on stdout.
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn notify(&self, event: PluginEvent) {
        if let Ok(line) = serde_json::to_string(&event) {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{line}");
        }
    }
}
