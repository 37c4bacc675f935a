mod broker_client;
mod coordination_client;
mod kafka_broker_client;
mod record_producer;
mod topic_admin;
mod zookeeper_client;

pub use broker_client::*;
pub use coordination_client::*;
pub use kafka_broker_client::*;
pub use record_producer::*;
pub use topic_admin::*;
pub use zookeeper_client::*;
