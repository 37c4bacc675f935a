use crate::backend::{ChildrenWatch, CoordinationClient, CoordinationError, WatchEvent};
use anyhow::{bail, Context};
use tracing::{debug, info};
use zookeeper_client as zk;

pub struct ZookeeperCoordinationClient {
    client: zk::Client,
}

impl ZookeeperCoordinationClient {
    pub async fn connect(nodes: &[String]) -> Result<Self, anyhow::Error> {
        if nodes.is_empty() {
            bail!("No ZooKeeper nodes specified")
        }
        let cluster = nodes.join(",");
        let client = zk::Client::connect(&cluster)
            .await
            .with_context(|| format!("While connecting to ZooKeeper {}", cluster))?;

        info!("Connected to ZooKeeper {}", cluster);

        Ok(Self { client })
    }
}

impl CoordinationClient for ZookeeperCoordinationClient {
    async fn children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        let (children, _) = self
            .client
            .get_children(path)
            .await
            .map_err(|e| map_error(path, e))?;

        Ok(children)
    }

    async fn children_with_watch(
        &self,
        path: &str,
    ) -> Result<(Vec<String>, ChildrenWatch), CoordinationError> {
        let (children, _, watcher) = self
            .client
            .get_and_watch_children(path)
            .await
            .map_err(|e| map_error(path, e))?;

        let watch = ChildrenWatch::new(async move {
            let event = watcher.changed().await;
            debug!("ZooKeeper watch fired: {:?}", event);
            to_watch_event(event.event_type)
        });

        Ok((children, watch))
    }

    async fn data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        let (data, _) = self
            .client
            .get_data(path)
            .await
            .map_err(|e| map_error(path, e))?;

        Ok(data)
    }
}

fn to_watch_event(event_type: zk::EventType) -> WatchEvent {
    match event_type {
        zk::EventType::NodeChildrenChanged => WatchEvent::ChildrenChanged,
        zk::EventType::Session => WatchEvent::Session,
        _ => WatchEvent::NodeChanged,
    }
}

fn map_error(path: &str, error: zk::Error) -> CoordinationError {
    match error {
        zk::Error::NoNode => CoordinationError::NoNode(path.to_owned()),
        e => CoordinationError::Unavailable(
            anyhow::Error::new(e).context(format!("While reading ZooKeeper node {}", path)),
        ),
    }
}
