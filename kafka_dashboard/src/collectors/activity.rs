use crate::backend::{BrokerClient, OffsetBound};
use crate::collectors::{CollectorSettings, MinMaxOffset};
use crate::consumer::PartitionOffset;
use crate::error::CollectError;
use futures_util::future::try_join_all;
use std::time::Duration;
use tracing::trace;

/// Offsets sampled twice, `activity_window` apart.
///
/// * `messages`/`lag`: retained messages (`newest - oldest`) summed over partitions
///   at the end of the window.
/// * `active`: some partition's newest offset moved forward during the window.
/// * `throughput`: messages produced per second during the window.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityMetrics {
    pub active: bool,
    pub messages: i64,
    pub lag: i64,
    pub throughput: f64,
    pub newest_offsets: Vec<PartitionOffset>,
}

pub async fn get_activity_metrics<B: BrokerClient>(
    broker: &B,
    topic: &str,
    settings: &CollectorSettings,
) -> Result<ActivityMetrics, CollectError> {
    let partitions = broker
        .partitions(topic)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect::<Vec<_>>();

    let window_start = partitions
        .iter()
        .map(|partition| broker.offset(topic, *partition, OffsetBound::Newest))
        .collect::<Vec<_>>();
    let window_start = try_join_all(window_start).await?;

    if !settings.activity_window.is_zero() {
        tokio::time::sleep(settings.activity_window).await;
    }

    let window_end = partitions
        .iter()
        .map(|partition| sample_partition(broker, topic, *partition))
        .collect::<Vec<_>>();
    let window_end = try_join_all(window_end).await?;

    let metrics = summarize(
        &partitions,
        &window_start,
        &window_end,
        settings.activity_window,
    );
    trace!("Activity of topic {}: {:?}", topic, metrics);

    Ok(metrics)
}

async fn sample_partition<B: BrokerClient>(
    broker: &B,
    topic: &str,
    partition: i32,
) -> Result<MinMaxOffset, CollectError> {
    let (min_offset, max_offset) = tokio::try_join!(
        broker.offset(topic, partition, OffsetBound::Oldest),
        broker.offset(topic, partition, OffsetBound::Newest),
    )?;

    Ok(MinMaxOffset {
        min_offset,
        max_offset,
    })
}

fn summarize(
    partitions: &[i32],
    window_start: &[i64],
    window_end: &[MinMaxOffset],
    window: Duration,
) -> ActivityMetrics {
    let mut messages = 0;
    let mut produced = 0;
    let mut active = false;
    let mut newest_offsets = Vec::with_capacity(partitions.len());

    for ((partition, start_newest), offsets) in partitions.iter().zip(window_start).zip(window_end)
    {
        messages += offsets.messages_count();
        if offsets.max_offset > *start_newest {
            active = true;
            produced += offsets.max_offset - start_newest;
        }
        newest_offsets.push(PartitionOffset::new(*partition, offsets.max_offset));
    }

    let throughput = if window.is_zero() {
        0.0
    } else {
        produced as f64 / window.as_secs_f64()
    };

    ActivityMetrics {
        active,
        messages,
        lag: messages,
        throughput,
        newest_offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(min_offset: i64, max_offset: i64) -> MinMaxOffset {
        MinMaxOffset {
            min_offset,
            max_offset,
        }
    }

    #[test]
    fn static_offsets_are_inactive() {
        let metrics = summarize(
            &[0, 1, 2],
            &[100, 100, 100],
            &[offsets(0, 100), offsets(0, 100), offsets(0, 100)],
            Duration::from_secs(1),
        );

        assert!(!metrics.active);
        assert_eq!(metrics.messages, 300);
        assert_eq!(metrics.lag, 300);
        assert_eq!(metrics.throughput, 0.0);
    }

    #[test]
    fn advancing_partition_marks_topic_active() {
        let metrics = summarize(
            &[0, 1],
            &[100, 50],
            &[offsets(0, 100), offsets(10, 70)],
            Duration::from_millis(500),
        );

        assert!(metrics.active);
        assert_eq!(metrics.messages, 160);
        assert_eq!(metrics.throughput, 40.0);
        assert_eq!(
            metrics.newest_offsets,
            vec![PartitionOffset::new(0, 100), PartitionOffset::new(1, 70)]
        );
    }

    #[test]
    fn zero_window_has_no_throughput() {
        let metrics = summarize(&[0], &[1], &[offsets(0, 5)], Duration::ZERO);

        assert!(metrics.active);
        assert_eq!(metrics.throughput, 0.0);
    }
}
