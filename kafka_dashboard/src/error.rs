use std::fmt::{Display, Formatter};

/// Failure of a single collection unit (one topic, one broker, one query).
#[derive(Debug)]
pub enum CollectError {
    /// Network or connection failure to the broker cluster or coordination service.
    BackendUnavailable(anyhow::Error),
    TopicNotFound(String),
    PartitionNotFound { topic: String, partition: i32 },
    /// Malformed data returned by a backend.
    Decode(anyhow::Error),
}

impl Display for CollectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::BackendUnavailable(e) => write!(f, "Backend unavailable: {e:#}"),
            CollectError::TopicNotFound(topic) => write!(f, "Topic {topic} wasn't found"),
            CollectError::PartitionNotFound { topic, partition } => {
                write!(f, "Partition {partition} of topic {topic} wasn't found")
            }
            CollectError::Decode(e) => write!(f, "Malformed backend data: {e:#}"),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::BackendUnavailable(e) | CollectError::Decode(e) => Some(&**e),
            CollectError::TopicNotFound(_) | CollectError::PartitionNotFound { .. } => None,
        }
    }
}
