mod consumer_wrapper;
mod partition_offset;
mod security_protocol;

pub use consumer_wrapper::*;
pub use partition_offset::*;
pub use security_protocol::*;
