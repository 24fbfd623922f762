use crate::pick::RequestId;

/// Services the embedding activity provides.
pub trait Host: Send + Sync {
    /// Present the system folder chooser for `request`. The outcome comes back
    /// later through [`crate::LocalMusic::complete_pick`].
    fn launch_folder_chooser(&self, request: RequestId) -> Result<(), String>;

    /// Ask for a read/write grant on `tree_uri` that outlives this session.
    fn take_persistable_grant(&self, tree_uri: &str) -> Result<(), String>;
}
