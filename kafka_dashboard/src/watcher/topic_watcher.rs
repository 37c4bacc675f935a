use crate::backend::{CoordinationClient, WatchEvent};
use crate::collectors::TOPICS_PATH;
use crate::watcher::TopicRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, trace, warn, Instrument};

#[derive(Debug, Clone)]
pub struct WatcherSettings {
    pub watch_timeout: Duration,
    pub backoff: Duration,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            watch_timeout: Duration::from_secs(10),
            backoff: Duration::from_secs(1),
        }
    }
}

/// Keeps [`TopicRegistry`] in sync with the children of the coordination service's
/// topic node. Backend failures are retried after a backoff; the loop only stops on
/// shutdown.
pub struct TopicWatcher<C> {
    coordination: Arc<C>,
    registry: Arc<TopicRegistry>,
    settings: WatcherSettings,
}

impl<C: CoordinationClient> TopicWatcher<C> {
    pub fn new(coordination: Arc<C>, registry: Arc<TopicRegistry>, settings: WatcherSettings) -> Self {
        Self {
            coordination,
            registry,
            settings,
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::task::spawn(self.run(shutdown).instrument(info_span!("Watching topics")))
    }

    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            let registration = select! {
                registration = self.coordination.children_with_watch(TOPICS_PATH) => registration,
                _ = shutdown.cancelled() => break,
            };

            let watch = match registration {
                Ok((children, watch)) => {
                    let count = children.len();
                    if self.registry.publish(children) {
                        info!("Known topics updated. Count: {}", count);
                    }
                    watch
                }
                Err(e) => {
                    warn!(
                        "Failed to watch {}: {}. Retrying in {:?}",
                        TOPICS_PATH, e, self.settings.backoff
                    );
                    select! {
                        _ = sleep(self.settings.backoff) => continue,
                        _ = shutdown.cancelled() => break,
                    }
                }
            };

            select! {
                event = watch => match event {
                    WatchEvent::ChildrenChanged => info!("Topics changed"),
                    event => debug!("Topic watch woke up: {:?}", event),
                },
                _ = sleep(self.settings.watch_timeout) => {
                    trace!("Topic watch timed out, re-arming");
                }
                _ = shutdown.cancelled() => break,
            }
        }

        info!("Topic watcher stopped");
    }
}
