use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Time between the two offset samples of an activity measurement.
    pub activity_window: Duration,
    /// Upper bound of concurrently running topic/broker collections in one pass.
    pub max_concurrent_collections: usize,
    pub include_consumer_group_lag: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            activity_window: Duration::from_secs(1),
            max_concurrent_collections: 16,
            include_consumer_group_lag: false,
        }
    }
}
