mod topic_registry;
mod topic_watcher;

pub use topic_registry::*;
pub use topic_watcher::*;
