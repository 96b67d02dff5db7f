//! Cross-task control primitives for the jiggle engine.
//!
//! The controller is the only producer and the engine the only
//! consumer of each primitive; single-word atomics replace the
//! original volatile-flags-under-critical-section discipline.

use core::sync::atomic::{AtomicBool, Ordering};

/// Two-level cancellation for the jiggle engine.
///
/// `stop` is cooperative and honored at pacing-tick boundaries;
/// `force_stop` is additionally polled inside the fine-grained sweep
/// helpers so the engine can vacate within one pointer step.
/// Requesting a forced stop implies the cooperative one.
pub struct CancelToken {
    stop: AtomicBool,
    force_stop: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            force_stop: AtomicBool::new(false),
        }
    }

    /// Request cooperative cancellation.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Request preemptive cancellation (implies `request_stop`).
    pub fn request_force_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.force_stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn force_stop_requested(&self) -> bool {
        self.force_stop.load(Ordering::SeqCst)
    }

    /// Clear both levels.  Called by the engine when it re-arms.
    pub fn clear(&self) {
        self.stop.store(false, Ordering::SeqCst);
        self.force_stop.store(false, Ordering::SeqCst);
    }
}

/// Dormancy latch published by the jiggle engine.
///
/// The engine raises it while parked in its Off state; the controller
/// spins on it (yielding) after a forced stop to guarantee no
/// synthetic event races a de-configuration.
pub struct EngineStatus {
    dormant: AtomicBool,
}

impl EngineStatus {
    /// Engines start dormant until first armed.
    pub const fn new() -> Self {
        Self {
            dormant: AtomicBool::new(true),
        }
    }

    pub fn set_dormant(&self, dormant: bool) {
        self.dormant.store(dormant, Ordering::SeqCst);
    }

    pub fn is_dormant(&self) -> bool {
        self.dormant.load(Ordering::SeqCst)
    }
}

/// Resumable pause for the jiggle engine, used while the host holds
/// the bus suspended.  The engine blocks in `ready()` at its pacing
/// points; state and episode survive the pause.
#[cfg(feature = "embedded")]
pub struct PauseGate {
    paused: AtomicBool,
    resumed: embassy_sync::signal::Signal<
        embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
        (),
    >,
}

#[cfg(feature = "embedded")]
impl PauseGate {
    pub const fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
            resumed: embassy_sync::signal::Signal::new(),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.resumed.signal(());
    }

    /// Wait here until not paused.
    pub async fn ready(&self) {
        while self.paused.load(Ordering::SeqCst) {
            self.resumed.wait().await;
        }
    }
}
