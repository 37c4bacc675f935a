mod handler;
mod request;
mod sample_message;

pub use handler::*;
pub use request::*;
pub use sample_message::*;
