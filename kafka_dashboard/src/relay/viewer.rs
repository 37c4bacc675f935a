use bytes::Bytes;
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ViewerId(Uuid);

impl ViewerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Display for ViewerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) struct Viewer {
    pub id: ViewerId,
    pub sink: Sender<Bytes>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Delivery {
    Delivered,
    /// The viewer's buffer is full.
    Lagging,
    Disconnected,
}

impl Viewer {
    /// Never waits: a viewer that can't take the payload right away is reported as
    /// lagging.
    pub fn deliver(&self, payload: &Bytes) -> Delivery {
        match self.sink.try_send(payload.clone()) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::Lagging,
            Err(TrySendError::Closed(_)) => Delivery::Disconnected,
        }
    }
}
