mod common;

use common::FakeCoordination;
use kafka_dashboard::watcher::{TopicRegistry, TopicWatcher, WatcherSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

fn settings() -> WatcherSettings {
    WatcherSettings {
        watch_timeout: Duration::from_secs(10),
        backoff: Duration::from_millis(10),
    }
}

async fn eventually(condition: impl Fn() -> bool) {
    timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

fn topics(registry: &TopicRegistry) -> Vec<String> {
    registry
        .current()
        .map(|(topics, _)| topics.to_vec())
        .unwrap_or_default()
}

#[tokio::test]
async fn publishes_topics_and_follows_changes() {
    let coordination = Arc::new(FakeCoordination::new());
    coordination.add_topic("payments", 1, 1);
    coordination.add_topic("orders", 1, 1);
    let registry = Arc::new(TopicRegistry::new());
    let shutdown = CancellationToken::new();

    let handle = TopicWatcher::new(coordination.clone(), registry.clone(), settings())
        .spawn(shutdown.clone());

    eventually(|| topics(&registry) == ["orders", "payments"]).await;
    let generation = registry.generation();

    coordination.add_topic("audit", 1, 1);
    coordination.notify_children_changed();

    eventually(|| topics(&registry) == ["audit", "orders", "payments"]).await;
    assert_eq!(registry.generation(), generation + 1);

    shutdown.cancel();
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn retries_after_backend_failure() {
    let coordination = Arc::new(FakeCoordination::new());
    coordination.add_topic("orders", 1, 1);
    coordination.fail_next(3);
    let registry = Arc::new(TopicRegistry::new());
    let shutdown = CancellationToken::new();

    let handle = TopicWatcher::new(coordination.clone(), registry.clone(), settings())
        .spawn(shutdown.clone());

    eventually(|| topics(&registry) == ["orders"]).await;

    shutdown.cancel();
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn rearms_watch_after_timeout_without_new_generation() {
    let coordination = Arc::new(FakeCoordination::new());
    coordination.add_topic("orders", 1, 1);
    let registry = Arc::new(TopicRegistry::new());
    let shutdown = CancellationToken::new();
    let settings = WatcherSettings {
        watch_timeout: Duration::from_millis(20),
        ..settings()
    };

    let handle =
        TopicWatcher::new(coordination.clone(), registry.clone(), settings).spawn(shutdown.clone());

    eventually(|| coordination.watch_registrations() >= 3).await;
    assert_eq!(registry.generation(), 1);

    shutdown.cancel();
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
}
