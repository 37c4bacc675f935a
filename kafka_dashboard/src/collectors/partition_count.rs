use crate::backend::CoordinationClient;
use crate::collectors::{topic_node_error, topic_partitions_path};
use crate::error::CollectError;

pub async fn get_partition_count<C: CoordinationClient>(
    coordination: &C,
    topic: &str,
) -> Result<usize, CollectError> {
    let partitions = coordination
        .children(&topic_partitions_path(topic))
        .await
        .map_err(|e| topic_node_error(topic, e))?;

    Ok(partitions.len())
}
