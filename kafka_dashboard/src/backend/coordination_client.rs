use crate::error::CollectError;
use anyhow::anyhow;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    ChildrenChanged,
    NodeChanged,
    /// Session state change; the watch is gone and has to be registered again.
    Session,
}

/// One-shot notification for a watched node. Dropping it abandons the watch.
pub struct ChildrenWatch {
    inner: Pin<Box<dyn Future<Output = WatchEvent> + Send>>,
}

impl ChildrenWatch {
    pub fn new(notification: impl Future<Output = WatchEvent> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(notification),
        }
    }
}

impl Future for ChildrenWatch {
    type Output = WatchEvent;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

#[derive(Debug)]
pub enum CoordinationError {
    NoNode(String),
    Unavailable(anyhow::Error),
}

impl Display for CoordinationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinationError::NoNode(path) => write!(f, "Node {path} doesn't exist"),
            CoordinationError::Unavailable(e) => write!(f, "{e:#}"),
        }
    }
}

impl std::error::Error for CoordinationError {}

impl From<CoordinationError> for CollectError {
    fn from(value: CoordinationError) -> Self {
        match value {
            CoordinationError::NoNode(path) => {
                CollectError::BackendUnavailable(anyhow!("Node {path} doesn't exist"))
            }
            CoordinationError::Unavailable(e) => CollectError::BackendUnavailable(e),
        }
    }
}

/// Read access to the coordination service holding the cluster metadata.
pub trait CoordinationClient: Send + Sync + 'static {
    fn children(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<String>, CoordinationError>> + Send;

    fn children_with_watch(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<(Vec<String>, ChildrenWatch), CoordinationError>> + Send;

    fn data(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, CoordinationError>> + Send;
}
