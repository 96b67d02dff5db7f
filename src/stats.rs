//! Diagnostics counters.
//!
//! Monotonic, never reset at runtime; read by the stats dump command.
//! Plain relaxed atomics - each counter has one writer and the dump
//! tolerates tearing-free point-in-time reads.

use core::sync::atomic::{AtomicU32, Ordering};

/// Per-assembler IN submission counters.
pub struct SubmitCounters {
    ok: AtomicU32,
    not_ready: AtomicU32,
    interrupted: AtomicU32,
}

/// Point-in-time copy of one assembler's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitSnapshot {
    pub ok: u32,
    pub not_ready: u32,
    pub interrupted: u32,
}

impl SubmitCounters {
    pub const fn new() -> Self {
        Self {
            ok: AtomicU32::new(0),
            not_ready: AtomicU32::new(0),
            interrupted: AtomicU32::new(0),
        }
    }

    pub fn count_ok(&self) {
        self.ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_not_ready(&self) {
        self.not_ready.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_interrupted(&self) {
        self.interrupted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SubmitSnapshot {
        SubmitSnapshot {
            ok: self.ok.load(Ordering::Relaxed),
            not_ready: self.not_ready.load(Ordering::Relaxed),
            interrupted: self.interrupted.load(Ordering::Relaxed),
        }
    }
}

/// All diagnostics counters of the device.
pub struct Stats {
    /// Mouse IN endpoint submissions.
    pub mouse: SubmitCounters,
    /// Keyboard IN endpoint submissions.
    pub keyboard: SubmitCounters,
    /// Jiggle-generated events dropped on a full mouse queue.
    jiggle_drops: AtomicU32,
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            mouse: SubmitCounters::new(),
            keyboard: SubmitCounters::new(),
            jiggle_drops: AtomicU32::new(0),
        }
    }

    pub fn count_jiggle_drop(&self) {
        self.jiggle_drops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn jiggle_drops(&self) -> u32 {
        self.jiggle_drops.load(Ordering::Relaxed)
    }
}

/// Process-wide counters, live for the device lifetime.
pub static STATS: Stats = Stats::new();

/// Dump all non-zero counters to the log (diagnostics command).
#[cfg(feature = "embedded")]
pub fn log_stats() {
    let m = STATS.mouse.snapshot();
    let k = STATS.keyboard.snapshot();
    defmt::info!(
        "stats: mouse ok={} enrdy={} eintr={}",
        m.ok,
        m.not_ready,
        m.interrupted
    );
    defmt::info!(
        "stats: keyboard ok={} enrdy={} eintr={}",
        k.ok,
        k.not_ready,
        k.interrupted
    );
    defmt::info!("stats: jiggle queue drops={}", STATS.jiggle_drops());
}
