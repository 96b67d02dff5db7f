//! Error types for jigusb.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! Protocol/state invariant violations (unexpected link-state values,
//! unknown queue-set members) are deliberately NOT represented here:
//! they indicate a logic or hardware fault, and the owning task panics
//! into the system-wide error handler instead of attempting recovery.

/// Result of one IN report submission to the USB transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubmitError {
    /// The IN endpoint is not ready - typically the device is
    /// temporarily de-configured.  Transient; retried with backoff.
    EndpointNotReady,

    /// The transfer was interrupted mid-flight.  Transient; retried
    /// with backoff.
    Interrupted,

    /// Any other transport failure.  Not retryable - the submitting
    /// task aborts to the critical-error handler.
    Fatal,
}

/// Rejection of a synthetic-input command at the validation boundary.
///
/// No state is mutated when a command is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CmdError {
    /// Delta outside [-127, 127] or key code outside [1, 101].
    OutOfRange,

    /// The target event queue is full.  The event is dropped and
    /// counted; the caller is never blocked.
    QueueFull,
}
