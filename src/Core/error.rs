use std::io;
use thiserror::Error;

/// Every failure the command queue can report.
///
/// `QueueFull`, `TimedOut` and `SignalFailure` are the "try again later"
/// conditions; everything else is either a caller bug or terminal for the
/// operation that produced it.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Empty or oversized payload, undersized output buffer, or bad construction parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The ring holds `capacity` records; the caller decides whether to drop or retry.
    #[error("queue is full")]
    QueueFull,

    /// Non-blocking pop found nothing to read.
    #[error("queue is empty")]
    QueueEmpty,

    /// A bounded wait reached its deadline without observing data.
    #[error("timed out waiting for data")]
    TimedOut,

    /// The notification mechanism could not be used. On push the record is
    /// still enqueued; only the prompt wakeup of the consumer is in doubt.
    #[error("wait primitive failure: {0}")]
    SignalFailure(#[source] io::Error),

    /// The queue was cancelled while (or before) the caller was waiting.
    #[error("wait cancelled")]
    Cancelled,

    /// Resources backing the queue could not be created.
    #[error("failed to initialise queue: {0}")]
    Init(#[source] io::Error),

    /// `shutdown` was called while other handles still reference the queue.
    #[error("queue still referenced by {refs} other handle(s)")]
    InUse { refs: usize },
}

impl QueueError {
    /// True for the conditions a caller may legitimately treat as "retry later".
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QueueError::QueueFull | QueueError::TimedOut | QueueError::SignalFailure(_)
        )
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        QueueError::InvalidArgument(msg.into())
    }
}

impl From<QueueError> for io::Error {
    fn from(err: QueueError) -> Self {
        let kind = match &err {
            QueueError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            QueueError::QueueFull | QueueError::QueueEmpty => io::ErrorKind::WouldBlock,
            QueueError::TimedOut => io::ErrorKind::TimedOut,
            QueueError::SignalFailure(e) | QueueError::Init(e) => e.kind(),
            QueueError::Cancelled => io::ErrorKind::Interrupted,
            QueueError::InUse { .. } => io::ErrorKind::ResourceBusy,
        };
        io::Error::new(kind, err)
    }
}

pub type QueueResult<T> = Result<T, QueueError>;
