//! Fire-and-forget notifications delivered to the shell's listeners.

use std::sync::mpsc::Sender;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PluginEvent {
    /// A picked folder is about to be scanned.
    ScanStarted { uri: String },
    /// Cumulative match count, every `progress_interval` matches.
    ScanProgress { count: usize },
    /// A picked folder finished scanning.
    ScanCompleted { count: usize },
}

impl PluginEvent {
    /// Listener name the shell subscribes to.
    pub fn name(&self) -> &'static str {
        match self {
            PluginEvent::ScanStarted { .. } => "scanStarted",
            PluginEvent::ScanProgress { .. } => "scanProgress",
            PluginEvent::ScanCompleted { .. } => "scanCompleted",
        }
    }
}

/// Listener delivery. Implementations must not block the scan for long and
/// never report failures back.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: PluginEvent);
}

/// Forwards events over a channel; a hung-up receiver is ignored.
pub struct ChannelSink {
    tx: Sender<PluginEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<PluginEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn notify(&self, event: PluginEvent) {
        let _ = self.tx.send(event);
    }
}
