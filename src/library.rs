//! Audio file discovery.
//!
//! Two traversal modes share one extension filter and one progress policy:
//! direct directory walks yielding paths (`scan`) and document-tree walks
//! yielding uris (`tree`).

mod filter;
mod model;
mod progress;
mod scan;
mod tree;

pub use filter::{AudioFilter, is_hidden_dir_name};
pub use model::*;
pub use progress::ProgressCounter;
pub use scan::Scanner;
