pub mod get_cluster_health;
pub mod get_consumer_groups;
pub mod get_kafka_metrics;
