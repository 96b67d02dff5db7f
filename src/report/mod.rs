//! IN report assembly - coalesces queued discrete events into USB HID
//! reports and owns the submission retry loops.
//!
//! The transport is reached through the [`ReportSink`] seam so the
//! fold and retry logic stays host-testable.

pub mod keyboard;
pub mod mouse;

use crate::error::SubmitError;
use crate::stats::SubmitCounters;

/// The transport's blocking, retryable report-submit primitive.
pub trait ReportSink {
    /// Submit one assembled IN report.  Completes when the transfer
    /// is accepted or rejects with a [`SubmitError`].
    async fn submit(&mut self, data: &[u8]) -> Result<(), SubmitError>;
}

/// What the retry loop does after one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryStep {
    /// Accepted; the cycle is complete.
    Done,
    /// Transient rejection; wait the fixed backoff and resubmit the
    /// same report unchanged.
    Backoff,
    /// Unexpected transport failure; abort to the critical-error
    /// handler.
    Fatal,
}

/// Counting retry policy shared by both assemblers.
///
/// Transient rejections (`EndpointNotReady`, `Interrupted`) are
/// counted and retried; success is counted and ends the cycle; any
/// other failure is fatal and deliberately not counted.
pub struct SubmitRetry<'a> {
    counters: &'a SubmitCounters,
}

impl<'a> SubmitRetry<'a> {
    pub fn new(counters: &'a SubmitCounters) -> Self {
        Self { counters }
    }

    pub fn on_result(&self, result: Result<(), SubmitError>) -> RetryStep {
        match result {
            Ok(()) => {
                self.counters.count_ok();
                RetryStep::Done
            }
            Err(SubmitError::EndpointNotReady) => {
                self.counters.count_not_ready();
                RetryStep::Backoff
            }
            Err(SubmitError::Interrupted) => {
                self.counters.count_interrupted();
                RetryStep::Backoff
            }
            Err(SubmitError::Fatal) => RetryStep::Fatal,
        }
    }
}

/// Submit one report, retrying transient rejections with a fixed
/// backoff until the transport accepts it.  The buffer is resubmitted
/// unchanged across retries.
#[cfg(feature = "embedded")]
pub async fn submit_with_retry<S: ReportSink>(
    sink: &mut S,
    data: &[u8],
    counters: &SubmitCounters,
) {
    let retry = SubmitRetry::new(counters);
    loop {
        match retry.on_result(sink.submit(data).await) {
            RetryStep::Done => return,
            RetryStep::Backoff => {
                embassy_time::Timer::after_millis(crate::config::SUBMIT_RETRY_BACKOFF_MS).await;
            }
            RetryStep::Fatal => {
                defmt::panic!("IN report submit failed fatally");
            }
        }
    }
}
