use crate::backend::CoordinationClient;
use crate::collectors::{topic_node_error, topic_path};
use crate::error::CollectError;
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

#[derive(Deserialize)]
struct TopicRegistration {
    #[serde(default)]
    partitions: HashMap<String, Vec<i32>>,
}

/// Replica count of partition 0. Replication is assumed to be uniform across the
/// topic's partitions.
pub async fn get_replication_factor<C: CoordinationClient>(
    coordination: &C,
    topic: &str,
) -> Result<usize, CollectError> {
    let data = coordination
        .data(&topic_path(topic))
        .await
        .map_err(|e| topic_node_error(topic, e))?;

    parse_replication_factor(&data)
        .with_context(|| format!("While decoding registration of topic {}", topic))
        .map_err(|e| {
            warn!("{:#}", e);
            CollectError::Decode(e)
        })
}

fn parse_replication_factor(data: &[u8]) -> Result<usize, anyhow::Error> {
    let registration: TopicRegistration =
        serde_json::from_slice(data).context("While parsing topic registration json")?;

    Ok(registration
        .partitions
        .get("0")
        .map(Vec::len)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replication_is_replica_count_of_first_partition() {
        let data = br#"{"version":2,"partitions":{"0":[1,2,3],"1":[2,3,1]},"adding_replicas":{}}"#;

        assert_eq!(parse_replication_factor(data).unwrap(), 3);
    }

    #[test]
    fn topic_without_partitions_has_no_replication() {
        assert_eq!(parse_replication_factor(br#"{"version":1}"#).unwrap(), 0);
    }

    #[test]
    fn malformed_registration_is_an_error() {
        assert!(parse_replication_factor(b"not json").is_err());
    }
}
