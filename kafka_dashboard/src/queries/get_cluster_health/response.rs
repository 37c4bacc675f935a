use crate::consumer::SecurityProtocol;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// The cluster is reachable but the topic list can't be read.
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterHealth {
    pub status: HealthStatus,
    pub brokers: usize,
    pub topics: usize,
    pub connected: bool,
    pub protocol: SecurityProtocol,
}
