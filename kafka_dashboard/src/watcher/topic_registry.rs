use parking_lot::RwLock;
use std::sync::Arc;

/// The known topic set, shared between the topic watcher (writer) and the snapshot
/// aggregator (reader). Every change bumps the generation.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    topics: Option<Arc<Vec<String>>>,
    generation: u64,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first publish.
    pub fn current(&self) -> Option<(Arc<Vec<String>>, u64)> {
        let state = self.state.read();
        state
            .topics
            .as_ref()
            .map(|topics| (topics.clone(), state.generation))
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Replaces the topic set. Returns `false` and keeps the generation if the set
    /// didn't change.
    pub fn publish(&self, mut topics: Vec<String>) -> bool {
        topics.sort();
        topics.dedup();

        let mut state = self.state.write();
        if state.topics.as_deref() == Some(&topics) {
            return false;
        }
        state.topics = Some(Arc::new(topics));
        state.generation += 1;

        true
    }
}
