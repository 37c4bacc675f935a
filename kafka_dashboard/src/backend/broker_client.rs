use crate::consumer::PartitionOffset;
use crate::error::CollectError;
use crate::models::BrokerInfo;
use bytes::Bytes;
use getset::Getters;
use std::future::Future;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;

/// Committed offset reported for a partition the group never committed.
pub const NO_COMMITTED_OFFSET: i64 = -1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OffsetBound {
    Oldest,
    Newest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDetails {
    pub id: i32,
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct GroupDescription {
    pub name: String,
    pub state: String,
    pub protocol_type: String,
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone)]
pub struct GroupMember {
    pub id: String,
    pub client_id: String,
    pub client_host: String,
    /// Raw consumer-protocol assignment, if the group is in a state that has one.
    pub assignment: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Record {
    partition_offset: PartitionOffset,
    payload: Bytes,
}

impl Record {
    pub fn new(partition_offset: PartitionOffset, payload: Bytes) -> Self {
        Self {
            partition_offset,
            payload,
        }
    }
}

/// Read access to the broker cluster.
pub trait BrokerClient: Send + Sync + 'static {
    fn topics(&self) -> impl Future<Output = Result<Vec<String>, CollectError>> + Send;

    fn partitions(
        &self,
        topic: &str,
    ) -> impl Future<Output = Result<Vec<PartitionDetails>, CollectError>> + Send;

    fn offset(
        &self,
        topic: &str,
        partition: i32,
        bound: OffsetBound,
    ) -> impl Future<Output = Result<i64, CollectError>> + Send;

    fn live_brokers(&self) -> impl Future<Output = Result<Vec<BrokerInfo>, CollectError>> + Send;

    fn consumer_groups(
        &self,
    ) -> impl Future<Output = Result<Vec<GroupDescription>, CollectError>> + Send;

    /// Committed offsets of `group` for the given partitions, [`NO_COMMITTED_OFFSET`]
    /// where nothing was committed.
    fn committed_offsets(
        &self,
        group: &str,
        topic: &str,
        partitions: &[i32],
    ) -> impl Future<Output = Result<Vec<PartitionOffset>, CollectError>> + Send;

    /// Opens a subscription to every partition of `topic`, positioned at the newest
    /// offset. The subscription stops when `cancellation_token` is cancelled or the
    /// receiver is dropped.
    fn subscribe(
        &self,
        topic: &str,
        cancellation_token: CancellationToken,
    ) -> impl Future<Output = Result<Receiver<Record>, CollectError>> + Send;
}
