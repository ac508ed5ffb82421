//! Producer/consumer demo around a single `BoundedQueue`.
//!
//! A TX thread pushes random commands, an RX thread drains them, and the
//! supervisor (the caller of [`run`]) cancels RX once TX is done. All
//! reporting goes through `tracing`; the queue itself never logs.

mod config;
mod hexdump;
mod tasks;

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

use tracing::info;

pub use config::{BackoffArg, HarnessConfig, StrategyArg};
pub use hexdump::hex_dump;
pub use tasks::{rx_drain, rx_task, tx_task, CommandGenerator};

use crate::SPSC::{BoundedQueue, QueueBuilder};

/// Counters from a finished run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub sent: u64,
    pub dropped: u64,
    pub received: u64,
}

/// Runs TX and RX to completion.
///
/// Raising `stop` ends TX early; `on_queue` receives the queue before the
/// threads start so an external supervisor (a signal handler) can cancel it.
pub fn run_with<F>(config: &HarnessConfig, stop: Arc<AtomicBool>, on_queue: F) -> io::Result<RunReport>
where
    F: FnOnce(Arc<BoundedQueue>),
{
    config
        .validate()
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let (producer, consumer) = QueueBuilder::new()
        .with_capacity(config.capacity)
        .with_max_record_size(config.max_record_size)
        .with_wait_strategy(config.strategy.into())
        .with_backoff(config.backoff_policy())
        .build_pair()?;
    let queue = Arc::clone(producer.queue());
    on_queue(Arc::clone(&queue));

    info!(
        capacity = config.capacity,
        max_record_size = config.max_record_size,
        strategy = %queue.wait_strategy(),
        "queue ready"
    );

    let mut generator = CommandGenerator::new(config.seed, config.min_len, config.max_len);
    let sends = config.sends;
    let tx = thread::Builder::new()
        .name("tx".into())
        .spawn(move || {
            tx_task(&producer, &mut generator, sends, &stop);
            (producer.sent(), producer.dropped())
        })?;

    let rx_timeout = config.rx_timeout();
    let rx = match thread::Builder::new().name("rx".into()).spawn(move || {
        rx_task(&consumer, rx_timeout);
        consumer
    }) {
        Ok(rx) => rx,
        Err(e) => {
            queue.cancel()?;
            let _ = tx.join();
            return Err(e);
        }
    };

    let tx_result = tx.join();
    // RX drains whatever is left, then sees the cancellation.
    queue.cancel()?;
    let rx_result = rx.join();

    let (sent, dropped) = tx_result.map_err(|_| io::Error::other("TX thread panicked"))?;
    let consumer = rx_result.map_err(|_| io::Error::other("RX thread panicked"))?;

    // An early cancel (ctrl-c) can release RX while TX is still retrying.
    rx_drain(&consumer);
    let received = consumer.received();
    drop(consumer);

    // The supervisor hook may still hold a handle; tearing down is only
    // attempted once it has let go.
    if let Err(e) = BoundedQueue::shutdown(queue) {
        info!(error = %e, "queue left to its remaining owners");
    }

    let report = RunReport { sent, dropped, received };
    info!(?report, "run finished");
    Ok(report)
}

/// [`run_with`] without an external supervisor.
pub fn run(config: &HarnessConfig) -> io::Result<RunReport> {
    run_with(config, Arc::new(AtomicBool::new(false)), |_| {})
}
