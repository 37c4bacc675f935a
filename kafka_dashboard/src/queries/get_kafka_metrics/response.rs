use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct KafkaMetricsResponse {
    pub brokers: Vec<i32>,
    pub topics: BTreeMap<String, BTreeMap<i32, PartitionMetrics>>,
    /// Topics whose partitions couldn't be read, with the reason.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionMetrics {
    pub offset_newest: i64,
    pub offset_oldest: i64,
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
}
