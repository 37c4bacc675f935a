use crate::backend::{BrokerClient, NO_COMMITTED_OFFSET};
use crate::consumer::PartitionOffset;
use crate::error::CollectError;
use futures_util::future::try_join_all;
use std::collections::HashMap;
use tracing::debug;

/// Sum of `newest - committed` over every group that committed offsets for `topic`.
pub async fn get_consumer_group_lag<B: BrokerClient>(
    broker: &B,
    topic: &str,
    newest_offsets: &[PartitionOffset],
) -> Result<i64, CollectError> {
    let groups = broker.consumer_groups().await?;
    let partitions = newest_offsets
        .iter()
        .map(|p| *p.partition())
        .collect::<Vec<_>>();

    let committed = groups
        .iter()
        .map(|group| broker.committed_offsets(&group.name, topic, &partitions))
        .collect::<Vec<_>>();
    let committed = try_join_all(committed).await?;

    let newest = newest_offsets
        .iter()
        .map(|p| (*p.partition(), *p.offset()))
        .collect::<HashMap<_, _>>();

    let lag = committed
        .iter()
        .flatten()
        .map(|committed| lag_for_partition(&newest, committed))
        .sum::<i64>();

    debug!(
        "Consumer group lag of topic {} over {} groups: {}",
        topic,
        groups.len(),
        lag
    );

    Ok(lag)
}

fn lag_for_partition(newest: &HashMap<i32, i64>, committed: &PartitionOffset) -> i64 {
    if *committed.offset() == NO_COMMITTED_OFFSET {
        return 0;
    }

    newest
        .get(committed.partition())
        .map(|newest| (newest - committed.offset()).max(0))
        .unwrap_or_default()
}
