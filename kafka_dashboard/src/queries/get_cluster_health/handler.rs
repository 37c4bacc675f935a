use crate::backend::BrokerClient;
use crate::consumer::SecurityProtocol;
use crate::queries::get_cluster_health::{ClusterHealth, HealthStatus};
use tracing::warn;

/// Never fails: backend errors are reflected in the returned status.
pub async fn get_cluster_health<B: BrokerClient>(
    broker: &B,
    protocol: SecurityProtocol,
) -> ClusterHealth {
    let (brokers, topics) = tokio::join!(broker.live_brokers(), broker.topics());

    let connected = match &brokers {
        Ok(_) => true,
        Err(e) => {
            warn!("Health probe couldn't list brokers: {}", e);
            false
        }
    };
    let (status, topics) = match topics {
        Ok(topics) => (HealthStatus::Healthy, topics.len()),
        Err(e) => {
            warn!("Health probe couldn't list topics: {}", e);
            (HealthStatus::Degraded, 0)
        }
    };

    ClusterHealth {
        status: if connected { status } else { HealthStatus::Degraded },
        brokers: brokers.map(|b| b.len()).unwrap_or_default(),
        topics,
        connected,
        protocol,
    }
}
