mod assignment;
mod handler;

pub use assignment::*;
pub use handler::*;
