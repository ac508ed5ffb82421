// Module naming follows project convention (SPSC = Single-Producer Single-Consumer)
#[allow(non_snake_case)]
pub mod SPSC;

#[allow(non_snake_case)]
pub mod Core;

#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub mod ffi;
pub mod harness;

pub use Core::error::{QueueError, QueueResult};
pub use SPSC::Wait::WaitStrategy;
pub use SPSC::{BackoffPolicy, BoundedQueue, Consumer, Producer, QueueBuilder};
pub use SPSC::Structs::Record;
