mod activity;
mod brokers;
mod consumer_group_lag;
mod min_max_offset;
mod partition_count;
mod paths;
mod replication_factor;
mod settings;
mod topic_metrics;

pub use activity::*;
pub use brokers::*;
pub use consumer_group_lag::*;
pub use min_max_offset::*;
pub use partition_count::*;
pub use paths::*;
pub use replication_factor::*;
pub use settings::*;
pub use topic_metrics::*;
