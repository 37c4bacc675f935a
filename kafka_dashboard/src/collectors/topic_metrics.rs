use crate::backend::{BrokerClient, CoordinationClient};
use crate::collectors::{
    get_activity_metrics, get_consumer_group_lag, get_partition_count, get_replication_factor,
    CollectorSettings,
};
use crate::error::CollectError;
use crate::models::TopicMetrics;
use tracing::debug;

/// Collects all metrics of one topic. Partition count, replication factor and
/// activity are gathered concurrently; the first failure fails the whole topic.
#[tracing::instrument(skip(coordination, broker, settings))]
pub async fn collect_topic_metrics<C: CoordinationClient, B: BrokerClient>(
    coordination: &C,
    broker: &B,
    topic: &str,
    settings: &CollectorSettings,
) -> Result<TopicMetrics, CollectError> {
    let (partitions, replication, activity) = tokio::try_join!(
        get_partition_count(coordination, topic),
        get_replication_factor(coordination, topic),
        get_activity_metrics(broker, topic, settings),
    )?;

    let mut lag = activity.lag;
    if settings.include_consumer_group_lag {
        lag += get_consumer_group_lag(broker, topic, &activity.newest_offsets).await?;
    }

    debug!(
        "Collected topic {}. Partitions: {}, replication: {}, active: {}",
        topic, partitions, replication, activity.active
    );

    Ok(TopicMetrics {
        partitions,
        replication,
        active: activity.active,
        messages: activity.messages,
        lag,
        throughput: activity.throughput,
    })
}
