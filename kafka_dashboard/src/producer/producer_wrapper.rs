use crate::backend::RecordProducer;
use crate::connection_settings::ConnectionSettings;
use crate::consumer::PartitionOffset;
use crate::error::CollectError;
use anyhow::Context;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use std::ops::Deref;
use std::time::Duration;

pub struct ProducerWrapper {
    producer: FutureProducer,
    send_timeout: Duration,
}

impl ProducerWrapper {
    pub fn create(
        connection_settings: &ConnectionSettings,
        send_timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let mut config = ClientConfig::try_from(connection_settings)?;
        let producer: FutureProducer = config
            .set("message.timeout.ms", send_timeout.as_millis().to_string())
            .set("linger.ms", "0")
            .set("acks", "all")
            .create()
            .context("While creating a kafka FutureProducer")?;

        Ok(Self {
            producer,
            send_timeout,
        })
    }
}

impl RecordProducer for ProducerWrapper {
    async fn produce(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
    ) -> Result<PartitionOffset, CollectError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self
            .producer
            .send(record, Timeout::After(self.send_timeout))
            .await
        {
            Ok((partition, offset)) => Ok(PartitionOffset::new(partition, offset)),
            Err((kafka_error, _)) => Err(CollectError::BackendUnavailable(
                anyhow::Error::new(kafka_error)
                    .context(format!("While producing to topic {topic}")),
            )),
        }
    }
}

impl Deref for ProducerWrapper {
    type Target = FutureProducer;

    fn deref(&self) -> &Self::Target {
        &self.producer
    }
}
