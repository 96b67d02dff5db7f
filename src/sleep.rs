//! System sleep contract.
//!
//! The controller quiesces its dependents, then blocks in
//! [`Sleeper::enter`]; the USB transport's resume callback delivers
//! the wake.  Clock-domain gating and the actual low-power entry are
//! the sleep manager's concern, outside this core.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

pub struct Sleeper {
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl Sleeper {
    pub const fn new() -> Self {
        Self {
            wake: Signal::new(),
        }
    }

    /// Wake notification, safe to call from the transport's resume
    /// callback.  A wake that races the sleep entry is not lost:
    /// `enter` returns immediately on an already-pending signal.
    pub fn wake(&self) {
        self.wake.signal(());
    }

    /// Block until the next wake notification.
    pub async fn enter(&self) {
        self.wake.wait().await;
    }
}

/// The controller's sleep block primitive.
pub static SLEEPER: Sleeper = Sleeper::new();
