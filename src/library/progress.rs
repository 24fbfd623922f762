use crate::events::{EventSink, PluginEvent};

/// Match counter owned by a single scan. Every `interval`-th match emits a
/// `scanProgress` event carrying the running total.
pub struct ProgressCounter<'a> {
    interval: usize,
    count: usize,
    sink: &'a dyn EventSink,
}

impl<'a> ProgressCounter<'a> {
    pub fn new(interval: usize, sink: &'a dyn EventSink) -> Self {
        Self {
            interval: interval.max(1),
            count: 0,
            sink,
        }
    }

    pub fn record_match(&mut self) {
        self.count += 1;
        if self.count % self.interval == 0 {
            self.sink.notify(PluginEvent::ScanProgress { count: self.count });
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
