use crate::error::CollectError;
use std::future::Future;

pub trait TopicAdmin: Send + Sync + 'static {
    /// Returns `false` if the topic already existed.
    fn create_topic(
        &self,
        name: &str,
        partitions: i32,
        replication: i32,
    ) -> impl Future<Output = Result<bool, CollectError>> + Send;

    fn delete_topic(&self, name: &str) -> impl Future<Output = Result<(), CollectError>> + Send;
}
