use crate::backend::{BrokerClient, CoordinationClient};
use crate::collectors::{
    collect_topic_metrics, get_broker_ids, get_broker_info, CollectorSettings, BROKER_IDS_PATH,
    TOPICS_PATH,
};
use crate::error::CollectError;
use crate::models::{
    BrokerInfo, ClusterSnapshot, EntityError, EntityKind, TopicMetrics, TopicStatus,
};
use crate::watcher::TopicRegistry;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};

/// Builds [`ClusterSnapshot`]s and caches the latest one.
///
/// The published snapshot is computed once and served until it is invalidated,
/// explicitly refreshed, or the known topic set changes.
pub struct SnapshotAggregator<C, B> {
    coordination: Arc<C>,
    broker: Arc<B>,
    registry: Arc<TopicRegistry>,
    settings: CollectorSettings,
    published: RwLock<Option<PublishedSnapshot>>,
    invalidations: AtomicU64,
    refresh_gate: Mutex<()>,
}

struct PublishedSnapshot {
    snapshot: Arc<ClusterSnapshot>,
    topics_generation: u64,
}

enum CollectedEntry {
    Topic(usize, Result<TopicMetrics, CollectError>),
    Broker(usize, Result<BrokerInfo, CollectError>),
}

impl<C: CoordinationClient, B: BrokerClient> SnapshotAggregator<C, B> {
    pub fn new(
        coordination: Arc<C>,
        broker: Arc<B>,
        registry: Arc<TopicRegistry>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            coordination,
            broker,
            registry,
            settings,
            published: RwLock::new(None),
            invalidations: AtomicU64::new(0),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Returns the cached snapshot, running an aggregation pass only if there is none.
    /// Concurrent callers share a single pass.
    pub async fn get(&self) -> Result<Arc<ClusterSnapshot>, CollectError> {
        if let Some(snapshot) = self.current() {
            return Ok(snapshot);
        }
        let _gate = self.refresh_gate.lock().await;

        if let Some(snapshot) = self.current() {
            return Ok(snapshot);
        }
        self.run_pass().await
    }

    /// Runs a new aggregation pass and publishes its result.
    pub async fn refresh(&self) -> Result<Arc<ClusterSnapshot>, CollectError> {
        let _gate = self.refresh_gate.lock().await;
        self.run_pass().await
    }

    /// Drops the published snapshot. A pass already in flight still returns its
    /// result to its caller but does not publish it.
    pub fn invalidate(&self) {
        let mut published = self.published.write();
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        *published = None;
    }

    /// The published snapshot, if it was built from the current topic set.
    pub fn current(&self) -> Option<Arc<ClusterSnapshot>> {
        let generation = self.registry.generation();
        self.published
            .read()
            .as_ref()
            .filter(|published| published.topics_generation >= generation)
            .map(|published| published.snapshot.clone())
    }

    /// Collects a single topic without touching the cache.
    pub async fn topic_metrics(&self, topic: &str) -> Result<TopicMetrics, CollectError> {
        collect_topic_metrics(&*self.coordination, &*self.broker, topic, &self.settings).await
    }

    #[tracing::instrument(skip_all)]
    async fn run_pass(&self) -> Result<Arc<ClusterSnapshot>, CollectError> {
        let invalidations = self.invalidations.load(Ordering::SeqCst);
        let (topics, topics_generation) = self.known_topics().await?;
        let snapshot = Arc::new(self.aggregate(&topics).await);

        if snapshot.is_partial() {
            warn!(
                "Snapshot collected with {} failed entries",
                snapshot.errors.len()
            );
        }
        info!(
            "Snapshot collected. Topics: {}, active: {}, brokers: {}",
            snapshot.total_topics,
            snapshot.active_topics,
            snapshot.brokers.len()
        );

        let mut published = self.published.write();
        if self.invalidations.load(Ordering::SeqCst) == invalidations {
            *published = Some(PublishedSnapshot {
                snapshot: snapshot.clone(),
                topics_generation,
            });
        } else {
            info!("Snapshot was invalidated during collection and is not published");
        }

        Ok(snapshot)
    }

    async fn known_topics(&self) -> Result<(Arc<Vec<String>>, u64), CollectError> {
        if let Some(current) = self.registry.current() {
            return Ok(current);
        }

        let generation = self.registry.generation();
        let mut topics = self.coordination.children(TOPICS_PATH).await?;
        topics.sort();

        Ok((Arc::new(topics), generation))
    }

    async fn aggregate(&self, topics: &[String]) -> ClusterSnapshot {
        let mut errors = vec![];
        let broker_ids = match get_broker_ids(&*self.coordination).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Failed to list brokers: {}", e);
                errors.push(EntityError::new(EntityKind::Broker, BROKER_IDS_PATH, &e));
                vec![]
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent_collections.max(1)));
        let mut tasks = JoinSet::new();

        for (index, topic) in topics.iter().enumerate() {
            let coordination = self.coordination.clone();
            let broker = self.broker.clone();
            let settings = self.settings.clone();
            let semaphore = semaphore.clone();
            let topic = topic.clone();
            let future = async move {
                let _permit = semaphore.acquire().await.ok();
                let result =
                    collect_topic_metrics(&*coordination, &*broker, &topic, &settings).await;
                CollectedEntry::Topic(index, result)
            }
            .instrument(info_span!("Collecting topic").or_current());
            tasks.spawn(future);
        }

        for (index, broker_id) in broker_ids.iter().enumerate() {
            let coordination = self.coordination.clone();
            let semaphore = semaphore.clone();
            let broker_id = broker_id.clone();
            let future = async move {
                let _permit = semaphore.acquire().await.ok();
                CollectedEntry::Broker(index, get_broker_info(&*coordination, &broker_id).await)
            }
            .instrument(info_span!("Resolving broker").or_current());
            tasks.spawn(future);
        }

        let mut topic_slots = topics.iter().map(|_| None).collect::<Vec<_>>();
        let mut broker_slots = broker_ids.iter().map(|_| None).collect::<Vec<_>>();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(CollectedEntry::Topic(index, result)) => topic_slots[index] = Some(result),
                Ok(CollectedEntry::Broker(index, result)) => broker_slots[index] = Some(result),
                Err(e) => error!("Collection task failed: {:?}", e),
            }
        }

        let mut statuses = Vec::with_capacity(topics.len());
        for (topic, slot) in topics.iter().zip(topic_slots) {
            match slot {
                Some(Ok(metrics)) => statuses.push(TopicStatus::new(topic.clone(), metrics)),
                Some(Err(e)) => {
                    warn!("Failed to collect topic {}: {}", topic, e);
                    errors.push(EntityError::new(EntityKind::Topic, topic.as_str(), &e));
                }
                None => errors.push(aborted(EntityKind::Topic, topic)),
            }
        }

        let mut brokers = Vec::with_capacity(broker_ids.len());
        for (broker_id, slot) in broker_ids.iter().zip(broker_slots) {
            match slot {
                Some(Ok(broker)) => brokers.push(broker),
                Some(Err(e)) => {
                    warn!("Failed to resolve broker {}: {}", broker_id, e);
                    errors.push(EntityError::new(EntityKind::Broker, broker_id.as_str(), &e));
                }
                None => errors.push(aborted(EntityKind::Broker, broker_id)),
            }
        }
        brokers.sort_by_key(|b| b.id);

        ClusterSnapshot::compose(topics.len(), statuses, brokers, errors)
    }
}

fn aborted(kind: EntityKind, name: &str) -> EntityError {
    EntityError {
        kind,
        name: name.to_owned(),
        error: "Collection task was aborted".to_owned(),
    }
}
