mod backoff;
mod builder;
mod consumer;
mod debug;
mod producer;
mod queue;

pub use backoff::BackoffPolicy;
pub use builder::QueueBuilder;
pub use consumer::Consumer;
pub use producer::Producer;
pub use queue::BoundedQueue;

pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub use Buffer::{Ring, Slot, DEFAULT_CAPACITY, MAX_RECORD_SIZE}; // re-export for stable path
}

pub mod Structs {
    pub mod Buffer_Structs;
    pub use Buffer_Structs::Record; // re-export for stable path
}

pub mod Wait;
