use crate::backend::{
    BrokerClient, GroupDescription, GroupMember, OffsetBound, PartitionDetails, Record,
    NO_COMMITTED_OFFSET,
};
use crate::connection_settings::ConnectionSettings;
use crate::consumer::{ConsumerWrapper, PartitionOffset};
use crate::error::CollectError;
use crate::models::BrokerInfo;
use anyhow::Context;
use bytes::Bytes;
use rdkafka::consumer::Consumer;
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::util::Timeout;
use rdkafka::{Message, Offset, TopicPartitionList};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, trace, Instrument};
use uuid::Uuid;

/// [`BrokerClient`] backed by librdkafka. Metadata and offset calls are blocking in
/// librdkafka and run on the blocking pool.
pub struct KafkaBrokerClient {
    consumer: Arc<ConsumerWrapper>,
    connection_settings: Arc<ConnectionSettings>,
    request_timeout: Duration,
}

impl KafkaBrokerClient {
    pub fn create(
        connection_settings: ConnectionSettings,
        request_timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let consumer = ConsumerWrapper::create_for_non_consuming(&connection_settings, None)
            .context("While creating metadata consumer")?;

        Ok(Self {
            consumer: Arc::new(consumer),
            connection_settings: Arc::new(connection_settings),
            request_timeout,
        })
    }

    fn timeout(&self) -> Timeout {
        Timeout::After(self.request_timeout)
    }
}

impl BrokerClient for KafkaBrokerClient {
    async fn topics(&self) -> Result<Vec<String>, CollectError> {
        let consumer = self.consumer.clone();
        let timeout = self.timeout();
        run_blocking(move || {
            let metadata = consumer
                .fetch_metadata(None, timeout)
                .map_err(|e| unavailable(e, "While fetching cluster metadata"))?;

            Ok(metadata
                .topics()
                .iter()
                .map(|topic| topic.name().to_owned())
                .collect())
        })
        .await
    }

    async fn partitions(&self, topic: &str) -> Result<Vec<PartitionDetails>, CollectError> {
        let consumer = self.consumer.clone();
        let timeout = self.timeout();
        let topic = topic.to_owned();
        run_blocking(move || {
            let metadata = consumer
                .fetch_metadata(Some(&topic), timeout)
                .map_err(|e| kafka_error(&topic, None, e, "While fetching topic metadata"))?;

            let Some(topic_metadata) = metadata.topics().iter().find(|t| t.name() == topic)
            else {
                return Err(CollectError::TopicNotFound(topic));
            };

            if topic_metadata.partitions().is_empty() {
                return Err(CollectError::TopicNotFound(topic));
            }

            trace!(
                "Got data for topic. Name: {}, partitions: {}",
                topic_metadata.name(),
                topic_metadata.partitions().len()
            );

            Ok(topic_metadata
                .partitions()
                .iter()
                .map(|partition| PartitionDetails {
                    id: partition.id(),
                    leader: partition.leader(),
                    replicas: partition.replicas().to_vec(),
                    isr: partition.isr().to_vec(),
                })
                .collect())
        })
        .await
    }

    async fn offset(
        &self,
        topic: &str,
        partition: i32,
        bound: OffsetBound,
    ) -> Result<i64, CollectError> {
        let consumer = self.consumer.clone();
        let timeout = self.timeout();
        let topic = topic.to_owned();
        run_blocking(move || {
            let (low, high) = consumer
                .fetch_watermarks(&topic, partition, timeout)
                .map_err(|e| {
                    kafka_error(&topic, Some(partition), e, "While fetching watermarks")
                })?;

            Ok(match bound {
                OffsetBound::Oldest => low,
                OffsetBound::Newest => high,
            })
        })
        .await
    }

    async fn live_brokers(&self) -> Result<Vec<BrokerInfo>, CollectError> {
        let consumer = self.consumer.clone();
        let timeout = self.timeout();
        run_blocking(move || {
            let metadata = consumer
                .fetch_metadata(None, timeout)
                .map_err(|e| unavailable(e, "While fetching cluster metadata"))?;

            Ok(metadata
                .brokers()
                .iter()
                .map(|broker| BrokerInfo {
                    id: broker.id(),
                    host: broker.host().to_owned(),
                    port: broker.port(),
                })
                .collect())
        })
        .await
    }

    async fn consumer_groups(&self) -> Result<Vec<GroupDescription>, CollectError> {
        let consumer = self.consumer.clone();
        let timeout = self.timeout();
        run_blocking(move || {
            let groups = consumer
                .fetch_group_list(None, timeout)
                .map_err(|e| unavailable(e, "While fetching groups"))?;

            Ok(groups
                .groups()
                .iter()
                .map(|group| GroupDescription {
                    name: group.name().to_owned(),
                    state: group.state().to_owned(),
                    protocol_type: group.protocol_type().to_owned(),
                    members: group
                        .members()
                        .iter()
                        .map(|member| GroupMember {
                            id: member.id().to_owned(),
                            client_id: member.client_id().to_owned(),
                            client_host: member.client_host().to_owned(),
                            assignment: member.assignment().map(|a| a.to_vec()),
                        })
                        .collect(),
                })
                .collect())
        })
        .await
    }

    async fn committed_offsets(
        &self,
        group: &str,
        topic: &str,
        partitions: &[i32],
    ) -> Result<Vec<PartitionOffset>, CollectError> {
        let connection_settings = self.connection_settings.clone();
        let timeout = self.timeout();
        let group = group.to_owned();
        let topic = topic.to_owned();
        let partitions = partitions.to_vec();
        run_blocking(move || {
            let consumer =
                ConsumerWrapper::create_for_non_consuming(&connection_settings, Some(&group))
                    .map_err(CollectError::BackendUnavailable)?;

            let mut tpl = TopicPartitionList::new();
            for partition in partitions {
                tpl.add_partition_offset(&topic, partition, Offset::Invalid)
                    .map_err(|e| kafka_error(&topic, Some(partition), e, "While building list"))?;
            }

            let committed = consumer
                .committed_offsets(tpl, timeout)
                .map_err(|e| kafka_error(&topic, None, e, "While fetching committed offsets"))?;

            Ok(committed
                .elements_for_topic(&topic)
                .iter()
                .map(|element| {
                    let offset = element
                        .offset()
                        .to_raw()
                        .filter(|offset| *offset >= 0)
                        .unwrap_or(NO_COMMITTED_OFFSET);
                    PartitionOffset::new(element.partition(), offset)
                })
                .collect())
        })
        .await
    }

    #[tracing::instrument(skip(self, cancellation_token))]
    async fn subscribe(
        &self,
        topic: &str,
        cancellation_token: CancellationToken,
    ) -> Result<Receiver<Record>, CollectError> {
        let partitions = self.partitions(topic).await?;

        let group = format!("kafka-dashboard-{}", Uuid::now_v7());
        let consumer = ConsumerWrapper::create_for_consuming(&self.connection_settings, &group)
            .map_err(CollectError::BackendUnavailable)?;

        let mut tpl = TopicPartitionList::new();
        for partition in &partitions {
            tpl.add_partition_offset(topic, partition.id, Offset::End)
                .map_err(|e| kafka_error(topic, Some(partition.id), e, "While building list"))?;
        }
        consumer
            .assign(&tpl)
            .map_err(|e| kafka_error(topic, None, e, "While assigning partitions"))?;

        debug!(
            "Assigned {} partitions of topic {} at newest offset",
            partitions.len(),
            topic
        );

        let (tx, rx) = tokio::sync::mpsc::channel(128);
        let future = consume_topic(topic.to_owned(), consumer, tx, cancellation_token)
            .instrument(info_span!("Consuming topic", topic).or_current());
        tokio::task::spawn(future);

        Ok(rx)
    }
}

async fn consume_topic(
    topic: String,
    consumer: ConsumerWrapper,
    tx: Sender<Record>,
    cancellation_token: CancellationToken,
) {
    loop {
        let message_result = select! {
            msg = consumer.recv() => {
                msg
            }
            _ = cancellation_token.cancelled() => {
                info!("Consuming topic {} was cancelled", topic);
                break
            }
        };

        let record = match message_result {
            Ok(message) => {
                trace!(
                    "New message. Topic: '{}', partition: {}, offset: {}",
                    message.topic(),
                    message.partition(),
                    message.offset(),
                );
                let Some(payload) = message.payload() else {
                    continue;
                };
                Record::new(
                    PartitionOffset::new(message.partition(), message.offset()),
                    Bytes::copy_from_slice(payload),
                )
            }
            Err(e) => {
                error!(
                    "Error while reading message from kafka consumer. Topic {}: {:?}",
                    topic, e
                );
                break;
            }
        };

        if tx.send(record).await.is_err() {
            debug!("Record receiver for topic {} was dropped", topic);
            break;
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, CollectError>
where
    F: FnOnce() -> Result<T, CollectError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("While joining blocking handle")
        .map_err(CollectError::BackendUnavailable)?
}

fn unavailable(error: KafkaError, context: &'static str) -> CollectError {
    CollectError::BackendUnavailable(anyhow::Error::new(error).context(context))
}

fn kafka_error(
    topic: &str,
    partition: Option<i32>,
    error: KafkaError,
    context: &'static str,
) -> CollectError {
    match (error.rdkafka_error_code(), partition) {
        (Some(RDKafkaErrorCode::UnknownPartition), Some(partition)) => {
            CollectError::PartitionNotFound {
                topic: topic.to_owned(),
                partition,
            }
        }
        (
            Some(RDKafkaErrorCode::UnknownTopicOrPartition | RDKafkaErrorCode::UnknownTopic),
            _,
        ) => CollectError::TopicNotFound(topic.to_owned()),
        _ => unavailable(error, context),
    }
}
