use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::hexdump::hex_dump;
use crate::Core::error::QueueError;
use crate::SPSC::{Consumer, Producer};

/// Random command source for the TX side.
pub struct CommandGenerator {
    rng: fastrand::Rng,
    min_len: usize,
    max_len: usize,
}

impl CommandGenerator {
    pub fn new(seed: Option<u64>, min_len: usize, max_len: usize) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng, min_len, max_len }
    }

    pub fn next_command(&mut self) -> Vec<u8> {
        let len = self.rng.usize(self.min_len..=self.max_len);
        let mut cmd = vec![0u8; len];
        self.rng.fill(&mut cmd);
        cmd
    }
}

/// Sends `sends` generated commands, stopping early if `stop` is raised.
pub fn tx_task(producer: &Producer, generator: &mut CommandGenerator, sends: usize, stop: &AtomicBool) {
    info!(task = "TX", sends, "start");

    for attempt in 1..=sends {
        if stop.load(Ordering::Acquire) {
            warn!(task = "TX", attempt, "stop requested");
            break;
        }

        let cmd = generator.next_command();
        match producer.send(&cmd) {
            Ok(len) => info!(task = "TX", attempt, len, hex = %hex_dump(&cmd), "sent command"),
            Err(QueueError::QueueFull) => warn!(task = "TX", attempt, "queue is full, command dropped"),
            Err(QueueError::SignalFailure(e)) => {
                warn!(task = "TX", attempt, len = cmd.len(), error = %e, "sent command, wakeup not delivered")
            }
            Err(e) => warn!(task = "TX", attempt, error = %e, "send failed"),
        }
    }

    info!(
        task = "TX",
        sent = producer.sent(),
        dropped = producer.dropped(),
        "completed all sends"
    );
}

/// Receives until the queue is cancelled and drained.
pub fn rx_task(consumer: &Consumer, timeout: Duration) {
    info!(task = "RX", "start");

    loop {
        match consumer.receive_timeout(timeout) {
            Ok(record) => {
                info!(task = "RX", len = record.len(), hex = %hex_dump(&record), "received command")
            }
            Err(QueueError::TimedOut) => debug!(task = "RX", ?timeout, "timeout occurred"),
            Err(QueueError::Cancelled) => break,
            Err(e) if e.is_retryable() => warn!(task = "RX", error = %e, "wait failed, retrying"),
            Err(e) => {
                warn!(task = "RX", error = %e, "receive failed");
                break;
            }
        }
    }

    info!(task = "RX", received = consumer.received(), "stopped");
}

/// Takes whatever is still queued once both tasks have finished.
///
/// A TX retry can land after RX has seen the cancellation; those records were
/// counted as sent and are received here instead of being lost.
pub fn rx_drain(consumer: &Consumer) -> usize {
    let mut drained = 0;
    loop {
        match consumer.receive() {
            Ok(Some(record)) => {
                drained += 1;
                info!(task = "RX", len = record.len(), hex = %hex_dump(&record), "drained command")
            }
            Ok(None) => break,
            Err(e) => {
                warn!(task = "RX", error = %e, "drain failed");
                break;
            }
        }
    }
    if drained > 0 {
        warn!(task = "RX", drained, "commands left after cancellation");
    }
    drained
}
