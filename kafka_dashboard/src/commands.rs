mod command_error;
pub mod create_topic;
pub mod delete_topic;
pub mod produce_sample_messages;

pub use command_error::*;
