use kafka_dashboard::admin::AdminWrapper;
use kafka_dashboard::backend::{KafkaBrokerClient, ZookeeperCoordinationClient};
use kafka_dashboard::consumer::SecurityProtocol;
use kafka_dashboard::relay::LiveRelay;
use kafka_dashboard::snapshot::SnapshotAggregator;
use std::sync::Arc;
use std::time::Duration;

pub type Aggregator = SnapshotAggregator<ZookeeperCoordinationClient, KafkaBrokerClient>;

pub struct AppState {
    pub aggregator: Aggregator,
    pub broker: Arc<KafkaBrokerClient>,
    pub admin: AdminWrapper,
    pub relay: LiveRelay<KafkaBrokerClient>,
    pub security_protocol: SecurityProtocol,
    pub viewer_buffer: usize,
    pub metrics_interval: Duration,
}
