use anyhow::{bail, Context};
use config::{Config, Environment, Source};
use kafka_dashboard::collectors::CollectorSettings;
use kafka_dashboard::connection_settings::{ConnectionSettings, SaslCredentials, SslSettings};
use kafka_dashboard::consumer::{SaslMechanism, SecurityProtocol};
use kafka_dashboard::watcher::WatcherSettings;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::time::Duration;
use tracing::info;

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub kafka: KafkaConfig,
    pub zookeeper: ZookeeperConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub test_topic: Option<TestTopicConfig>,
}

#[derive(Deserialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    #[serde(default = "default_security_protocol")]
    pub security_protocol: SecurityProtocol,
    pub sasl_mechanism: Option<SaslMechanism>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_ca_location: Option<String>,
    pub ssl_certificate_location: Option<String>,
    pub ssl_key_location: Option<String>,
    #[serde(default = "default_true")]
    pub ssl_verify_certificates: bool,
}

#[derive(Deserialize, Debug)]
pub struct ZookeeperConfig {
    pub nodes: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct CollectorConfig {
    pub activity_window_ms: u64,
    pub max_concurrent_collections: usize,
    pub include_consumer_group_lag: bool,
    pub request_timeout_ms: u64,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct WatcherConfig {
    pub watch_timeout_ms: u64,
    pub backoff_ms: u64,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct RelayConfig {
    /// Capacity of each viewer's outbound queue. A viewer whose queue is full is
    /// disconnected.
    pub viewer_buffer: usize,
    pub metrics_interval_ms: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TestTopicConfig {
    pub name: String,
    pub partitions: i32,
    #[serde(default = "default_replication")]
    pub replication: i32,
    /// Random JSON readings produced once the topic exists.
    #[serde(default = "default_sample_messages")]
    pub sample_messages: usize,
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

impl AppConfig {
    pub fn build() -> Result<Self, anyhow::Error> {
        Self::build_from(config::File::with_name("appsettings"))
    }

    /// Reads `settings` overridden by `App__`-prefixed environment variables.
    pub fn build_from<S>(settings: S) -> Result<Self, anyhow::Error>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(settings)
            .add_source(
                Environment::with_prefix("App")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("kafka.brokers")
                    .with_list_parse_key("zookeeper.nodes")
                    .try_parsing(true),
            )
            .build()
            .context("While building config")?;

        let deserialized_config: AppConfig = config
            .try_deserialize()
            .context("While deserializing config")?;
        deserialized_config
            .validate()
            .context("While validating config")?;

        info!("App config: {deserialized_config:?}");

        Ok(deserialized_config)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        let positive = [
            (
                "collector.max_concurrent_collections",
                self.collector.max_concurrent_collections as u64,
            ),
            ("collector.request_timeout_ms", self.collector.request_timeout_ms),
            ("watcher.watch_timeout_ms", self.watcher.watch_timeout_ms),
            ("watcher.backoff_ms", self.watcher.backoff_ms),
            ("relay.viewer_buffer", self.relay.viewer_buffer as u64),
            ("relay.metrics_interval_ms", self.relay.metrics_interval_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                bail!("{key} must be greater than zero");
            }
        }

        Ok(())
    }
}

impl KafkaConfig {
    pub fn connection_settings(&self) -> Result<ConnectionSettings, anyhow::Error> {
        let sasl = match (self.sasl_mechanism, &self.username, &self.password) {
            (Some(mechanism), Some(username), Some(password)) => Some(SaslCredentials {
                mechanism,
                username: username.clone(),
                password: password.clone(),
            }),
            (None, None, None) => None,
            _ => bail!(
                "kafka.sasl_mechanism, kafka.username and kafka.password must be set together"
            ),
        };

        Ok(ConnectionSettings {
            brokers: self.brokers.clone(),
            security_protocol: self.security_protocol,
            sasl,
            ssl: SslSettings {
                ca_location: self.ssl_ca_location.clone(),
                certificate_location: self.ssl_certificate_location.clone(),
                key_location: self.ssl_key_location.clone(),
                verify_certificates: self.ssl_verify_certificates,
            },
        })
    }
}

impl Debug for KafkaConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaConfig")
            .field("brokers", &self.brokers)
            .field("security_protocol", &self.security_protocol)
            .field("sasl_mechanism", &self.sasl_mechanism)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("ssl_ca_location", &self.ssl_ca_location)
            .field("ssl_certificate_location", &self.ssl_certificate_location)
            .field("ssl_key_location", &self.ssl_key_location)
            .field("ssl_verify_certificates", &self.ssl_verify_certificates)
            .finish()
    }
}

impl CollectorConfig {
    pub fn settings(&self) -> CollectorSettings {
        CollectorSettings {
            activity_window: Duration::from_millis(self.activity_window_ms),
            max_concurrent_collections: self.max_concurrent_collections,
            include_consumer_group_lag: self.include_consumer_group_lag,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl TestTopicConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            activity_window_ms: 1000,
            max_concurrent_collections: 16,
            include_consumer_group_lag: false,
            request_timeout_ms: 5000,
        }
    }
}

impl WatcherConfig {
    pub fn settings(&self) -> WatcherSettings {
        WatcherSettings {
            watch_timeout: Duration::from_millis(self.watch_timeout_ms),
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watch_timeout_ms: 10_000,
            backoff_ms: 1000,
        }
    }
}

impl RelayConfig {
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            viewer_buffer: 64,
            metrics_interval_ms: 1000,
        }
    }
}

fn default_security_protocol() -> SecurityProtocol {
    SecurityProtocol::Plaintext
}

fn default_true() -> bool {
    true
}

fn default_replication() -> i32 {
    1
}

fn default_sample_messages() -> usize {
    50
}

fn default_sample_interval_ms() -> u64 {
    100
}
