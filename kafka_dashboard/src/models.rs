mod broker_info;
mod cluster_snapshot;
mod consumer_group_view;
mod topic_status;

pub use broker_info::*;
pub use cluster_snapshot::*;
pub use consumer_group_view::*;
pub use topic_status::*;
