use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ProduceSampleMessagesCommandInternal {
    pub topic: String,
    pub count: usize,
    /// Pause between two messages.
    pub interval: Duration,
}
