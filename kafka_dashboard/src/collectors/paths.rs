use crate::backend::CoordinationError;
use crate::error::CollectError;

pub const TOPICS_PATH: &str = "/brokers/topics";
pub const BROKER_IDS_PATH: &str = "/brokers/ids";

pub fn topic_path(topic: &str) -> String {
    format!("{}/{}", TOPICS_PATH, topic)
}

pub fn topic_partitions_path(topic: &str) -> String {
    format!("{}/{}/partitions", TOPICS_PATH, topic)
}

pub fn broker_path(broker_id: &str) -> String {
    format!("{}/{}", BROKER_IDS_PATH, broker_id)
}

/// A missing node under a topic's path means the topic itself is gone.
pub(crate) fn topic_node_error(topic: &str, error: CoordinationError) -> CollectError {
    match error {
        CoordinationError::NoNode(_) => CollectError::TopicNotFound(topic.to_owned()),
        e => e.into(),
    }
}
