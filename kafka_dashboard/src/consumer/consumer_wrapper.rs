use crate::connection_settings::ConnectionSettings;
use anyhow::Context;
use rdkafka::consumer::StreamConsumer;
use rdkafka::ClientConfig;
use std::ops::Deref;

pub struct ConsumerWrapper {
    consumer: StreamConsumer,
}

impl ConsumerWrapper {
    /// Consumer for a live tail. It starts at the newest offsets and never commits.
    pub fn create_for_consuming(
        connection_settings: &ConnectionSettings,
        group: &str,
    ) -> Result<Self, anyhow::Error> {
        // https://raw.githubusercontent.com/confluentinc/librdkafka/master/CONFIGURATION.md
        let consumer: StreamConsumer =
            Self::create_common_config(connection_settings, Some(group))?
                .set("auto.offset.reset", "latest")
                .set("enable.partition.eof", "false")
                .set("session.timeout.ms", "10000")
                .set("enable.auto.commit", "false")
                .set("enable.auto.offset.store", "false")
                .set("receive.message.max.bytes", "2147483647")
                .create()
                .context("While creating kafka StreamConsumer")?;

        Ok(Self { consumer })
    }

    pub fn create_for_non_consuming(
        connection_settings: &ConnectionSettings,
        group: Option<&str>,
    ) -> Result<Self, anyhow::Error> {
        let consumer: StreamConsumer = Self::create_common_config(connection_settings, group)?
            .create()
            .context("While creating kafka StreamConsumer")?;

        Ok(Self { consumer })
    }

    fn create_common_config(
        connection_settings: &ConnectionSettings,
        group: Option<&str>,
    ) -> Result<ClientConfig, anyhow::Error> {
        let mut config = ClientConfig::try_from(connection_settings)?;

        if let Some(group) = group {
            config.set("group.id", group);
        }

        Ok(config)
    }
}

impl Deref for ConsumerWrapper {
    type Target = StreamConsumer;

    fn deref(&self) -> &Self::Target {
        &self.consumer
    }
}
