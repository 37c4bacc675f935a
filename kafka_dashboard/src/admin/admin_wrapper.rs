use crate::backend::TopicAdmin;
use crate::connection_settings::ConnectionSettings;
use crate::error::CollectError;
use anyhow::{anyhow, Context};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication, TopicResult};
use rdkafka::client::DefaultClientContext;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::info;

pub struct AdminWrapper {
    client: AdminClient<DefaultClientContext>,
    request_timeout: Duration,
}

impl AdminWrapper {
    pub fn create(
        connection_settings: &ConnectionSettings,
        request_timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let client: AdminClient<DefaultClientContext> =
            ClientConfig::try_from(connection_settings)?
                .create()
                .context("While creating kafka AdminClient")?;

        Ok(Self {
            client,
            request_timeout,
        })
    }

    fn options(&self) -> AdminOptions {
        AdminOptions::new().operation_timeout(Some(self.request_timeout))
    }
}

impl TopicAdmin for AdminWrapper {
    async fn create_topic(
        &self,
        name: &str,
        partitions: i32,
        replication: i32,
    ) -> Result<bool, CollectError> {
        let new_topic = NewTopic::new(name, partitions, TopicReplication::Fixed(replication));
        let results = self
            .client
            .create_topics([&new_topic], &self.options())
            .await
            .context("While creating topic")
            .map_err(CollectError::BackendUnavailable)?;

        match single_result(results)? {
            Ok(_) => {
                info!(
                    "Topic {} created with {} partitions and replication factor {}",
                    name, partitions, replication
                );
                Ok(true)
            }
            Err((_, RDKafkaErrorCode::TopicAlreadyExists)) => {
                info!("Topic {} already exists", name);
                Ok(false)
            }
            Err((topic, code)) => Err(CollectError::BackendUnavailable(anyhow!(
                "Broker rejected creation of topic {}: {}",
                topic,
                code
            ))),
        }
    }

    async fn delete_topic(&self, name: &str) -> Result<(), CollectError> {
        let results = self
            .client
            .delete_topics(&[name], &self.options())
            .await
            .context("While deleting topic")
            .map_err(CollectError::BackendUnavailable)?;

        match single_result(results)? {
            Ok(_) => {
                info!("Topic {} deleted", name);
                Ok(())
            }
            Err((topic, RDKafkaErrorCode::UnknownTopicOrPartition)) => {
                Err(CollectError::TopicNotFound(topic))
            }
            Err((topic, code)) => Err(CollectError::BackendUnavailable(anyhow!(
                "Broker rejected deletion of topic {}: {}",
                topic,
                code
            ))),
        }
    }
}

fn single_result(results: Vec<TopicResult>) -> Result<TopicResult, CollectError> {
    results.into_iter().next().ok_or_else(|| {
        CollectError::BackendUnavailable(anyhow!("Broker returned no result for topic operation"))
    })
}
