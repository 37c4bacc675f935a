use crate::backend::{BrokerClient, Record};
use crate::error::CollectError;
use crate::relay::{Delivery, Viewer, ViewerId};
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::Mutex;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, info_span, warn, Instrument};

type TopicTable = DashMap<String, Arc<TopicChannel>>;

/// Fans out live records of a topic to any number of viewers over a single upstream
/// subscription.
///
/// The subscription is opened when the first viewer of a topic attaches and closed
/// when the last one goes away. Viewers only get records that arrive after they
/// attached.
pub struct LiveRelay<B> {
    source: Arc<B>,
    topics: Arc<TopicTable>,
}

impl<B> Clone for LiveRelay<B> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            topics: self.topics.clone(),
        }
    }
}

#[derive(Default)]
struct TopicChannel {
    state: Mutex<ChannelState>,
}

/// A channel is used for exactly one subscription. Once closed it is removed from the
/// topic table and a later attach creates a new one.
#[derive(Default)]
struct ChannelState {
    viewers: Vec<Viewer>,
    upstream: Option<DropGuard>,
    closed: bool,
}

impl ChannelState {
    fn close(&mut self) {
        self.closed = true;
        self.viewers.clear();
        // Dropping the guard cancels the upstream subscription.
        self.upstream = None;
    }
}

impl<B: BrokerClient> LiveRelay<B> {
    pub fn new(source: Arc<B>) -> Self {
        Self {
            source,
            topics: Arc::new(DashMap::new()),
        }
    }

    /// Registers `sink` as a viewer of `topic`. The relay drops the sink when the
    /// viewer can't keep up or the upstream subscription ends.
    #[tracing::instrument(skip(self, sink))]
    pub async fn attach(&self, topic: &str, sink: Sender<Bytes>) -> Result<ViewerId, CollectError> {
        loop {
            let channel = self
                .topics
                .entry(topic.to_owned())
                .or_default()
                .value()
                .clone();
            let mut state = channel.state.lock().await;

            if state.closed {
                drop(state);
                forget(&self.topics, topic, &channel);
                continue;
            }

            if state.upstream.is_none() {
                let cancellation_token = CancellationToken::new();
                let records = match self
                    .source
                    .subscribe(topic, cancellation_token.clone())
                    .await
                {
                    Ok(records) => records,
                    Err(e) => {
                        state.close();
                        drop(state);
                        forget(&self.topics, topic, &channel);
                        return Err(e);
                    }
                };

                info!("Opened upstream subscription for topic {}", topic);
                let future = broadcast(
                    topic.to_owned(),
                    channel.clone(),
                    self.topics.clone(),
                    records,
                    cancellation_token.clone(),
                )
                .instrument(info_span!("Broadcasting topic", topic).or_current());
                tokio::task::spawn(future);

                state.upstream = Some(cancellation_token.drop_guard());
            }

            let id = ViewerId::new();
            state.viewers.push(Viewer { id, sink });
            debug!(
                "Viewer {} attached to topic {}. Viewers: {}",
                id,
                topic,
                state.viewers.len()
            );

            return Ok(id);
        }
    }

    /// Removes a viewer. Returns `false` if it wasn't attached, e.g. because the relay
    /// already dropped it.
    pub async fn detach(&self, topic: &str, viewer: ViewerId) -> bool {
        let Some(channel) = self.topics.get(topic).map(|c| c.value().clone()) else {
            return false;
        };
        let mut state = channel.state.lock().await;

        let count = state.viewers.len();
        state.viewers.retain(|v| v.id != viewer);
        let removed = state.viewers.len() != count;

        if removed && state.viewers.is_empty() {
            state.close();
            drop(state);
            forget(&self.topics, topic, &channel);
            info!(
                "Last viewer of topic {} detached, upstream subscription closed",
                topic
            );
        }

        removed
    }

    pub async fn viewer_count(&self, topic: &str) -> usize {
        let Some(channel) = self.topics.get(topic).map(|c| c.value().clone()) else {
            return 0;
        };
        let state = channel.state.lock().await;

        state.viewers.len()
    }

    /// Topics that currently have an upstream subscription.
    pub fn active_topics(&self) -> Vec<String> {
        let mut topics = self
            .topics
            .iter()
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        topics.sort();
        topics
    }
}

fn forget(topics: &TopicTable, topic: &str, channel: &Arc<TopicChannel>) {
    topics.remove_if(topic, |_, current| Arc::ptr_eq(current, channel));
}

async fn broadcast(
    topic: String,
    channel: Arc<TopicChannel>,
    topics: Arc<TopicTable>,
    mut records: Receiver<Record>,
    cancellation_token: CancellationToken,
) {
    loop {
        let record = select! {
            record = records.recv() => record,
            _ = cancellation_token.cancelled() => {
                debug!("Broadcasting topic {} was cancelled", topic);
                break
            }
        };

        let mut state = channel.state.lock().await;
        if state.closed {
            break;
        }

        let Some(record) = record else {
            warn!(
                "Upstream subscription for topic {} ended, dropping {} viewers",
                topic,
                state.viewers.len()
            );
            state.close();
            drop(state);
            forget(&topics, &topic, &channel);
            break;
        };

        let position = record.partition_offset();
        state
            .viewers
            .retain(|viewer| match viewer.deliver(record.payload()) {
                Delivery::Delivered => true,
                Delivery::Lagging => {
                    warn!(
                        "Viewer {} of topic {} can't keep up at partition {} offset {}, dropping it",
                        viewer.id,
                        topic,
                        position.partition(),
                        position.offset()
                    );
                    false
                }
                Delivery::Disconnected => {
                    debug!("Viewer {} of topic {} disconnected", viewer.id, topic);
                    false
                }
            });

        if state.viewers.is_empty() {
            info!(
                "No viewers of topic {} left, upstream subscription closed",
                topic
            );
            state.close();
            drop(state);
            forget(&topics, &topic, &channel);
            break;
        }
    }
}
