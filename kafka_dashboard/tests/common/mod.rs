#![allow(dead_code)]

use anyhow::anyhow;
use bytes::Bytes;
use kafka_dashboard::backend::{
    BrokerClient, ChildrenWatch, CoordinationClient, CoordinationError, GroupDescription,
    OffsetBound, PartitionDetails, Record, WatchEvent,
};
use kafka_dashboard::collectors::{
    broker_path, topic_partitions_path, topic_path, BROKER_IDS_PATH, TOPICS_PATH,
};
use kafka_dashboard::consumer::PartitionOffset;
use kafka_dashboard::error::CollectError;
use kafka_dashboard::models::BrokerInfo;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// In-memory coordination tree. Paths without an entry don't exist.
#[derive(Default)]
pub struct FakeCoordination {
    children: Mutex<BTreeMap<String, Vec<String>>>,
    data: Mutex<HashMap<String, Vec<u8>>>,
    unavailable: Mutex<HashSet<String>>,
    failures_left: AtomicUsize,
    watches: Mutex<Vec<oneshot::Sender<WatchEvent>>>,
    watch_registrations: AtomicUsize,
}

impl FakeCoordination {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.set_children(TOPICS_PATH, &[]);
        fake.set_children(BROKER_IDS_PATH, &[]);
        fake
    }

    pub fn set_children(&self, path: &str, children: &[&str]) {
        self.children.lock().insert(
            path.to_owned(),
            children.iter().map(|c| c.to_string()).collect(),
        );
    }

    pub fn set_data(&self, path: &str, data: &str) {
        self.data
            .lock()
            .insert(path.to_owned(), data.as_bytes().to_vec());
    }

    /// Registers a topic with `partitions` partitions, each with `replication`
    /// replicas.
    pub fn add_topic(&self, topic: &str, partitions: usize, replication: usize) {
        let replicas = (1..=replication).collect::<Vec<_>>();
        let assignment = (0..partitions)
            .map(|p| (p.to_string(), replicas.clone()))
            .collect::<BTreeMap<_, _>>();
        let registration = serde_json::json!({ "version": 1, "partitions": assignment });
        self.set_data(&topic_path(topic), &registration.to_string());

        let partition_ids = (0..partitions).map(|p| p.to_string()).collect::<Vec<_>>();
        self.children
            .lock()
            .insert(topic_partitions_path(topic), partition_ids);

        let mut children = self.children.lock();
        let topics = children.entry(TOPICS_PATH.to_owned()).or_default();
        if !topics.iter().any(|t| t == topic) {
            topics.push(topic.to_owned());
        }
    }

    pub fn add_broker(&self, id: i32, host: &str, port: i32) {
        let registration = serde_json::json!({ "host": host, "port": port, "version": 4 });
        self.set_data(&broker_path(&id.to_string()), &registration.to_string());

        let mut children = self.children.lock();
        let ids = children.entry(BROKER_IDS_PATH.to_owned()).or_default();
        ids.push(id.to_string());
    }

    /// Every call touching `path` fails with a connection error.
    pub fn make_unavailable(&self, path: &str) {
        self.unavailable.lock().insert(path.to_owned());
    }

    /// The next `count` calls fail regardless of path.
    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Fires every pending children watch.
    pub fn notify_children_changed(&self) {
        for watch in self.watches.lock().drain(..) {
            let _ = watch.send(WatchEvent::ChildrenChanged);
        }
    }

    pub fn watch_registrations(&self) -> usize {
        self.watch_registrations.load(Ordering::SeqCst)
    }

    fn check(&self, path: &str) -> Result<(), CoordinationError> {
        let failures_left = self.failures_left.load(Ordering::SeqCst);
        if failures_left > 0 {
            self.failures_left.store(failures_left - 1, Ordering::SeqCst);
            return Err(CoordinationError::Unavailable(anyhow!("connection loss")));
        }
        if self.unavailable.lock().contains(path) {
            return Err(CoordinationError::Unavailable(anyhow!(
                "connection loss at {path}"
            )));
        }
        Ok(())
    }

    fn read_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        self.check(path)?;
        self.children
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| CoordinationError::NoNode(path.to_owned()))
    }
}

impl CoordinationClient for FakeCoordination {
    async fn children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        self.read_children(path)
    }

    async fn children_with_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, ChildrenWatch), CoordinationError> {
        let children = self.read_children(path)?;
        let (sender, receiver) = oneshot::channel();
        self.watches.lock().push(sender);
        self.watch_registrations.fetch_add(1, Ordering::SeqCst);

        let watch = ChildrenWatch::new(async move {
            receiver.await.unwrap_or(WatchEvent::Session)
        });

        Ok((children, watch))
    }

    async fn data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        self.check(path)?;
        self.data
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| CoordinationError::NoNode(path.to_owned()))
    }
}

pub struct Subscription {
    pub topic: String,
    pub cancellation_token: CancellationToken,
    pub sender: Sender<Record>,
}

/// In-memory broker cluster with static offsets unless a partition is set to grow.
#[derive(Default)]
pub struct FakeBroker {
    partitions: Mutex<HashMap<String, Vec<PartitionDetails>>>,
    offsets: Mutex<HashMap<(String, i32), (i64, i64)>>,
    growth: Mutex<HashMap<(String, i32), i64>>,
    unavailable_topics: Mutex<HashSet<String>>,
    brokers: Mutex<Vec<BrokerInfo>>,
    groups: Mutex<Vec<GroupDescription>>,
    committed: Mutex<HashMap<(String, String, i32), i64>>,
    subscriptions: Mutex<Vec<Subscription>>,
    partitions_delay: Mutex<Duration>,
    partition_requests: AtomicUsize,
    peak_partition_requests: AtomicUsize,
    pub subscription_buffer: usize,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self {
            subscription_buffer: 16,
            ..Self::default()
        }
    }

    /// Every partition gets the same `oldest`/`newest` offsets.
    pub fn add_topic(&self, topic: &str, partitions: i32, oldest: i64, newest: i64) {
        let details = (0..partitions)
            .map(|id| PartitionDetails {
                id,
                leader: 1,
                replicas: vec![1],
                isr: vec![1],
            })
            .collect();
        self.partitions.lock().insert(topic.to_owned(), details);

        let mut offsets = self.offsets.lock();
        for partition in 0..partitions {
            offsets.insert((topic.to_owned(), partition), (oldest, newest));
        }
    }

    /// Each read of the partition's newest offset advances it by `step`.
    pub fn grow(&self, topic: &str, partition: i32, step: i64) {
        self.growth
            .lock()
            .insert((topic.to_owned(), partition), step);
    }

    pub fn make_unavailable(&self, topic: &str) {
        self.unavailable_topics.lock().insert(topic.to_owned());
    }

    pub fn add_broker(&self, broker: BrokerInfo) {
        self.brokers.lock().push(broker);
    }

    pub fn add_group(&self, group: GroupDescription) {
        self.groups.lock().push(group);
    }

    pub fn commit(&self, group: &str, topic: &str, partition: i32, offset: i64) {
        self.committed
            .lock()
            .insert((group.to_owned(), topic.to_owned(), partition), offset);
    }

    /// Every partition listing takes `delay` from now on.
    pub fn delay_partitions(&self, delay: Duration) {
        *self.partitions_delay.lock() = delay;
    }

    pub fn partition_requests_in_flight(&self) -> usize {
        self.partition_requests.load(Ordering::SeqCst)
    }

    /// Highest number of partition listings seen running at once.
    pub fn peak_partition_requests(&self) -> usize {
        self.peak_partition_requests.load(Ordering::SeqCst)
    }

    pub fn subscriptions_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn cancelled_subscriptions_count(&self) -> usize {
        self.subscriptions
            .lock()
            .iter()
            .filter(|s| s.cancellation_token.is_cancelled())
            .count()
    }

    /// Sends `payload` to every live subscription of `topic`.
    pub async fn publish(&self, topic: &str, partition: i32, offset: i64, payload: &'static [u8]) {
        let senders = self
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.topic == topic && !s.cancellation_token.is_cancelled())
            .map(|s| s.sender.clone())
            .collect::<Vec<_>>();

        for sender in senders {
            let record = Record::new(
                PartitionOffset::new(partition, offset),
                Bytes::from_static(payload),
            );
            let _ = sender.send(record).await;
        }
    }

    /// Ends every subscription of `topic` as if the upstream consumer failed.
    pub fn close_subscriptions(&self, topic: &str) {
        self.subscriptions.lock().retain(|s| s.topic != topic);
    }

    fn check(&self, topic: &str) -> Result<(), CollectError> {
        if self.unavailable_topics.lock().contains(topic) {
            return Err(CollectError::BackendUnavailable(anyhow!(
                "broker for topic {topic} is unreachable"
            )));
        }
        Ok(())
    }
}

impl BrokerClient for FakeBroker {
    async fn topics(&self) -> Result<Vec<String>, CollectError> {
        let mut topics = self.partitions.lock().keys().cloned().collect::<Vec<_>>();
        topics.sort();
        Ok(topics)
    }

    async fn partitions(&self, topic: &str) -> Result<Vec<PartitionDetails>, CollectError> {
        let delay = *self.partitions_delay.lock();
        if !delay.is_zero() {
            let in_flight = self.partition_requests.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_partition_requests
                .fetch_max(in_flight, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.partition_requests.fetch_sub(1, Ordering::SeqCst);
        }

        self.check(topic)?;
        self.partitions
            .lock()
            .get(topic)
            .cloned()
            .ok_or_else(|| CollectError::TopicNotFound(topic.to_owned()))
    }

    async fn offset(
        &self,
        topic: &str,
        partition: i32,
        bound: OffsetBound,
    ) -> Result<i64, CollectError> {
        self.check(topic)?;
        let key = (topic.to_owned(), partition);
        let mut offsets = self.offsets.lock();
        let Some((oldest, newest)) = offsets.get_mut(&key) else {
            return Err(CollectError::PartitionNotFound {
                topic: topic.to_owned(),
                partition,
            });
        };

        match bound {
            OffsetBound::Oldest => Ok(*oldest),
            OffsetBound::Newest => {
                let current = *newest;
                *newest += self.growth.lock().get(&key).copied().unwrap_or_default();
                Ok(current)
            }
        }
    }

    async fn live_brokers(&self) -> Result<Vec<BrokerInfo>, CollectError> {
        Ok(self.brokers.lock().clone())
    }

    async fn consumer_groups(&self) -> Result<Vec<GroupDescription>, CollectError> {
        Ok(self.groups.lock().clone())
    }

    async fn committed_offsets(
        &self,
        group: &str,
        topic: &str,
        partitions: &[i32],
    ) -> Result<Vec<PartitionOffset>, CollectError> {
        let committed = self.committed.lock();
        let offsets = partitions
            .iter()
            .map(|partition| {
                let offset = committed
                    .get(&(group.to_owned(), topic.to_owned(), *partition))
                    .copied()
                    .unwrap_or(-1);
                PartitionOffset::new(*partition, offset)
            })
            .collect();
        Ok(offsets)
    }

    async fn subscribe(
        &self,
        topic: &str,
        cancellation_token: CancellationToken,
    ) -> Result<Receiver<Record>, CollectError> {
        self.check(topic)?;
        if !self.partitions.lock().contains_key(topic) {
            return Err(CollectError::TopicNotFound(topic.to_owned()));
        }

        let (sender, receiver) = tokio::sync::mpsc::channel(self.subscription_buffer.max(1));
        self.subscriptions.lock().push(Subscription {
            topic: topic.to_owned(),
            cancellation_token,
            sender,
        });

        Ok(receiver)
    }
}
