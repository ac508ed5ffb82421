use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::SPSC::Buffer::{DEFAULT_CAPACITY, MAX_RECORD_SIZE};
use crate::SPSC::Wait::WaitStrategy;
use crate::SPSC::BackoffPolicy;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Condvar,
    Eventfd,
}

impl From<StrategyArg> for WaitStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Condvar => WaitStrategy::Condvar,
            StrategyArg::Eventfd => WaitStrategy::EventFd,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackoffArg {
    Immediate,
    Fixed,
    Exponential,
    Spin,
}

/// Settings for one producer/consumer demo run.
#[derive(Clone, Debug, Parser)]
#[command(name = "cmdqueue_demo", about = "Push random commands through a bounded queue")]
pub struct HarnessConfig {
    /// Number of record slots
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Largest record the queue accepts, in bytes
    #[arg(long, default_value_t = MAX_RECORD_SIZE)]
    pub max_record_size: usize,

    #[arg(long, value_enum, default_value_t = StrategyArg::Condvar)]
    pub strategy: StrategyArg,

    /// Commands the TX task sends before finishing
    #[arg(long, default_value_t = 1000)]
    pub sends: usize,

    #[arg(long, default_value_t = 4)]
    pub min_len: usize,

    #[arg(long, default_value_t = 16)]
    pub max_len: usize,

    /// RX wait bound per receive; timeouts are logged and the loop continues
    #[arg(long, default_value_t = 1000)]
    pub rx_timeout_ms: u64,

    #[arg(long, value_enum, default_value_t = BackoffArg::Fixed)]
    pub backoff: BackoffArg,

    /// Base delay for fixed and exponential backoff
    #[arg(long, default_value_t = 1)]
    pub backoff_delay_ms: u64,

    #[arg(long, default_value_t = 8)]
    pub backoff_retries: u32,

    /// Seed for command generation; random when absent
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_record_size: MAX_RECORD_SIZE,
            strategy: StrategyArg::Condvar,
            sends: 1000,
            min_len: 4,
            max_len: 16,
            rx_timeout_ms: 1000,
            backoff: BackoffArg::Fixed,
            backoff_delay_ms: 1,
            backoff_retries: 8,
            seed: None,
        }
    }
}

impl HarnessConfig {
    pub fn backoff_policy(&self) -> BackoffPolicy {
        let delay = Duration::from_millis(self.backoff_delay_ms);
        match self.backoff {
            BackoffArg::Immediate => BackoffPolicy::Immediate,
            BackoffArg::Fixed => BackoffPolicy::Fixed {
                delay,
                max_retries: self.backoff_retries,
            },
            BackoffArg::Exponential => BackoffPolicy::Exponential {
                initial: delay,
                max_delay: delay.saturating_mul(64),
                max_retries: self.backoff_retries,
            },
            BackoffArg::Spin => BackoffPolicy::Spin,
        }
    }

    pub fn rx_timeout(&self) -> Duration {
        Duration::from_millis(self.rx_timeout_ms)
    }

    /// Rejects length bounds the queue could never accept.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_len == 0 || self.min_len > self.max_len {
            return Err(format!(
                "command length range {}..={} is empty or starts at zero",
                self.min_len, self.max_len
            ));
        }
        if self.max_len > self.max_record_size {
            return Err(format!(
                "max command length {} exceeds max record size {}",
                self.max_len, self.max_record_size
            ));
        }
        Ok(())
    }
}
