mod live_relay;
mod viewer;

pub use live_relay::*;
pub use viewer::*;
