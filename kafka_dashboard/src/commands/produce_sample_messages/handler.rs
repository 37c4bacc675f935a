use crate::backend::RecordProducer;
use crate::commands::produce_sample_messages::{ProduceSampleMessagesCommandInternal, SampleMessage};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const KEYS_COUNT: usize = 10;

/// Produces `count` random [`SampleMessage`]s, one per `interval`. A failed
/// message is logged and skipped. Returns the number of messages the broker
/// acknowledged.
#[tracing::instrument(skip(producer, cancellation_token))]
pub async fn produce_sample_messages<P: RecordProducer>(
    producer: &P,
    command: ProduceSampleMessagesCommandInternal,
    cancellation_token: CancellationToken,
) -> usize {
    info!(
        "Producing {} sample messages to topic {}",
        command.count, command.topic
    );

    let mut produced = 0;
    for index in 0..command.count {
        if index > 0 && !command.interval.is_zero() {
            select! {
                _ = tokio::time::sleep(command.interval) => {}
                _ = cancellation_token.cancelled() => {
                    info!("Producing sample messages to topic {} was cancelled", command.topic);
                    break;
                }
            }
        }

        let message = SampleMessage::random(&mut rand::thread_rng());
        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize sample message: {}", e);
                continue;
            }
        };
        let key = format!("key-{}", index % KEYS_COUNT);

        match producer.produce(&command.topic, &key, &payload).await {
            Ok(position) => {
                produced += 1;
                debug!(
                    "Sample message stored at partition {} offset {}",
                    position.partition(),
                    position.offset()
                );
            }
            Err(e) => warn!("Failed to produce sample message: {}", e),
        }
    }

    info!(
        "Produced {} of {} sample messages to topic {}",
        produced, command.count, command.topic
    );

    produced
}
