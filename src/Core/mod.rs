pub mod error;
#[cfg(target_os = "linux")]
pub mod eventfd;

pub use error::{QueueError, QueueResult};
