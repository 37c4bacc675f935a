use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicStatus {
    pub name: String,
    pub partitions: usize,
    pub replication: usize,
    pub active: bool,
    pub messages: i64,
    pub lag: i64,
    pub throughput: f64,
}

/// Metrics of a single topic without its name, as served by the topic endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicMetrics {
    pub partitions: usize,
    pub replication: usize,
    pub active: bool,
    pub messages: i64,
    pub lag: i64,
    pub throughput: f64,
}

impl TopicStatus {
    pub fn new(name: String, metrics: TopicMetrics) -> Self {
        Self {
            name,
            partitions: metrics.partitions,
            replication: metrics.replication,
            active: metrics.active,
            messages: metrics.messages,
            lag: metrics.lag,
            throughput: metrics.throughput,
        }
    }
}
