use crate::consumer::PartitionOffset;
use crate::error::CollectError;
use std::future::Future;

pub trait RecordProducer: Send + Sync + 'static {
    /// Returns where the record was stored once the broker acknowledged it.
    fn produce(
        &self,
        topic: &str,
        key: &str,
        payload: &[u8],
    ) -> impl Future<Output = Result<PartitionOffset, CollectError>> + Send;
}
