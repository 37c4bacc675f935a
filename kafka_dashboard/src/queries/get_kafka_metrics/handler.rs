use crate::backend::{BrokerClient, OffsetBound, PartitionDetails};
use crate::error::CollectError;
use crate::queries::get_kafka_metrics::{KafkaMetricsResponse, PartitionMetrics};
use futures_util::future::try_join_all;
use std::collections::BTreeMap;
use tracing::warn;

/// Dumps offsets and replica placement of every partition in the cluster.
pub async fn get_kafka_metrics<B: BrokerClient>(
    broker: &B,
) -> Result<KafkaMetricsResponse, CollectError> {
    let (brokers, mut topics) = tokio::try_join!(broker.live_brokers(), broker.topics())?;
    topics.sort();

    let mut brokers = brokers.into_iter().map(|b| b.id).collect::<Vec<_>>();
    brokers.sort_unstable();

    let mut response = KafkaMetricsResponse {
        brokers,
        topics: BTreeMap::new(),
        errors: BTreeMap::new(),
    };

    for topic in topics {
        match get_topic_partitions(broker, &topic).await {
            Ok(partitions) => {
                response.topics.insert(topic, partitions);
            }
            Err(e) => {
                warn!("Couldn't read partitions of topic {}: {}", topic, e);
                response.errors.insert(topic, e.to_string());
            }
        }
    }

    Ok(response)
}

async fn get_topic_partitions<B: BrokerClient>(
    broker: &B,
    topic: &str,
) -> Result<BTreeMap<i32, PartitionMetrics>, CollectError> {
    let partitions = broker.partitions(topic).await?;

    let futures = partitions
        .into_iter()
        .map(|details| get_partition_metrics(broker, topic, details))
        .collect::<Vec<_>>();
    let metrics = try_join_all(futures).await?;

    Ok(metrics.into_iter().collect())
}

async fn get_partition_metrics<B: BrokerClient>(
    broker: &B,
    topic: &str,
    details: PartitionDetails,
) -> Result<(i32, PartitionMetrics), CollectError> {
    let (offset_oldest, offset_newest) = tokio::try_join!(
        broker.offset(topic, details.id, OffsetBound::Oldest),
        broker.offset(topic, details.id, OffsetBound::Newest),
    )?;

    let metrics = PartitionMetrics {
        offset_newest,
        offset_oldest,
        leader: details.leader,
        replicas: details.replicas,
        isr: details.isr,
    };

    Ok((details.id, metrics))
}
