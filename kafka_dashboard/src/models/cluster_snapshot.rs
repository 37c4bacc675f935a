use crate::error::CollectError;
use crate::models::{BrokerInfo, TopicStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one aggregation pass. All fields describe the same pass and must be
/// read together.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterSnapshot {
    pub topics: Vec<TopicStatus>,
    pub total_topics: usize,
    pub active_topics: usize,
    pub partitions: usize,
    pub brokers: Vec<BrokerInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EntityError>,
    pub collected_at: DateTime<Utc>,
}

impl ClusterSnapshot {
    /// Derives the totals from the collected entries. `total_topics` is the size of
    /// the known topic set, including topics whose collection failed.
    pub fn compose(
        total_topics: usize,
        topics: Vec<TopicStatus>,
        brokers: Vec<BrokerInfo>,
        errors: Vec<EntityError>,
    ) -> Self {
        let active_topics = topics.iter().filter(|t| t.active).count();
        let partitions = topics.iter().map(|t| t.partitions).sum();

        Self {
            topics,
            total_topics,
            active_topics,
            partitions,
            brokers,
            errors,
            collected_at: Utc::now(),
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn topic(&self, name: &str) -> Option<&TopicStatus> {
        self.topics.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Topic,
    Broker,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Topic => "topic",
            EntityKind::Broker => "broker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityError {
    pub kind: EntityKind,
    pub name: String,
    pub error: String,
}

impl EntityError {
    pub fn new(kind: EntityKind, name: impl Into<String>, error: &CollectError) -> Self {
        Self {
            kind,
            name: name.into(),
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(name: &str, partitions: usize, active: bool) -> TopicStatus {
        TopicStatus {
            name: name.to_owned(),
            partitions,
            replication: 1,
            active,
            messages: 0,
            lag: 0,
            throughput: 0.0,
        }
    }

    #[test]
    fn totals_are_derived_from_collected_topics() {
        let snapshot = ClusterSnapshot::compose(
            3,
            vec![status("orders", 3, true), status("payments", 2, false)],
            vec![],
            vec![EntityError::new(
                EntityKind::Topic,
                "audit",
                &CollectError::TopicNotFound("audit".to_owned()),
            )],
        );

        assert_eq!(snapshot.total_topics, 3);
        assert_eq!(snapshot.active_topics, 1);
        assert_eq!(snapshot.partitions, 5);
        assert!(snapshot.is_partial());
        assert_eq!(snapshot.topic("payments").map(|t| t.partitions), Some(2));
    }

    #[test]
    fn serializes_with_dashboard_field_names() {
        let snapshot = ClusterSnapshot::compose(
            1,
            vec![status("orders", 3, false)],
            vec![BrokerInfo {
                id: 1,
                host: "kafka-1".to_owned(),
                port: 9092,
            }],
            vec![],
        );

        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["TotalTopics"], json!(1));
        assert_eq!(value["Topics"][0]["Name"], json!("orders"));
        assert_eq!(value["Topics"][0]["Replication"], json!(1));
        assert_eq!(
            value["Brokers"][0],
            json!({"ID": 1, "Hostname": "kafka-1", "Port": 9092})
        );
        assert!(value.get("Errors").is_none());
    }
}
