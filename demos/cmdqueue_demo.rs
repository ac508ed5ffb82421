use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use dmxp_cmdqueue::harness::{self, HarnessConfig};
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .init();

    let config = HarnessConfig::parse();
    let stop = Arc::new(AtomicBool::new(false));

    let report = harness::run_with(&config, Arc::clone(&stop), |queue| {
        let result = ctrlc::set_handler(move || {
            stop.store(true, Ordering::Release);
            if let Err(e) = queue.cancel() {
                tracing::warn!(error = %e, "failed to cancel queue");
            }
        });
        if let Err(e) = result {
            tracing::warn!(error = %e, "ctrl-c handler not installed");
        }
    })?;

    println!(
        "sent={} dropped={} received={}",
        report.sent, report.dropped, report.received
    );
    Ok(())
}
