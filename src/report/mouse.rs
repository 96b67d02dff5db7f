//! Mouse report assembler.
//!
//! Coalesces queued pointer/wheel/button events into one outgoing
//! report per submission cycle.  At most one event of each kind is
//! folded into a pending report; a second event of a kind already
//! present is deferred to the next cycle, never dropped or merged.
//!
//! The queues cannot be peeked, so the deferred event lives in a
//! one-slot carry-over owned by the assembler and becomes the first
//! event of the next cycle - delivery order is unchanged.

use crate::event::MouseEvent;
use crate::hid::mouse::MouseReport;

/// Outcome of offering one event to the pending report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Folded {
    /// Folded into the pending report.
    Accepted,
    /// A same-kind event is already folded; carry this one over.
    Deferred,
}

/// Per-cycle fold state over a persistent report.
///
/// The button bitmap persists across cycles (button events carry
/// absolute state); motion fields are cleared by [`begin_cycle`].
///
/// [`begin_cycle`]: MouseFold::begin_cycle
pub struct MouseFold {
    report: MouseReport,
    pointer: bool,
    wheel: bool,
    button: bool,
}

impl MouseFold {
    pub const fn new() -> Self {
        Self {
            report: MouseReport::new(),
            pointer: false,
            wheel: false,
            button: false,
        }
    }

    /// Start a new submission cycle.
    pub fn begin_cycle(&mut self) {
        self.report.clear_motion();
        self.pointer = false;
        self.wheel = false;
        self.button = false;
    }

    /// Offer one event to the pending report.
    pub fn fold(&mut self, event: MouseEvent) -> Folded {
        match event {
            MouseEvent::Pointer { dx, dy } => {
                if self.pointer {
                    return Folded::Deferred;
                }
                self.report.x = dx;
                self.report.y = dy;
                self.pointer = true;
            }
            MouseEvent::Wheel { delta } => {
                if self.wheel {
                    return Folded::Deferred;
                }
                self.report.wheel = delta;
                self.wheel = true;
            }
            MouseEvent::Buttons { mask } => {
                if self.button {
                    return Folded::Deferred;
                }
                self.report.buttons = mask;
                self.button = true;
            }
        }
        Folded::Accepted
    }

    /// The report assembled so far this cycle.
    pub fn report(&self) -> &MouseReport {
        &self.report
    }
}

/// Run the mouse report assembler.
///
/// Dormant until the Link-State Controller releases the start gate on
/// entry to Configured.  Each cycle drains the queue through the fold,
/// submits the assembled report (retrying under back-pressure), then
/// blocks for the next event - one report per event burst, no
/// busy-polling.
#[cfg(feature = "embedded")]
pub async fn run(sink: &mut impl super::ReportSink) -> ! {
    use crate::hid::mouse::MOUSE_REPORT_SIZE;
    use crate::{ipc, stats};

    ipc::MOUSE_START.wait().await;
    defmt::info!("mouse reporting started");

    let mut fold = MouseFold::new();
    let mut carry: Option<MouseEvent> = None;
    let mut buf = [0u8; MOUSE_REPORT_SIZE];

    loop {
        fold.begin_cycle();
        if let Some(event) = carry.take() {
            // Cannot defer: the cycle is empty.
            let _ = fold.fold(event);
        }
        while carry.is_none() {
            match ipc::MOUSE_EVENTS.try_receive() {
                Ok(event) => {
                    if fold.fold(event) == Folded::Deferred {
                        carry = Some(event);
                    }
                }
                Err(_) => break,
            }
        }

        let n = fold.report().serialize(&mut buf);
        super::submit_with_retry(sink, &buf[..n], &stats::STATS.mouse).await;

        if carry.is_none() {
            carry = Some(ipc::MOUSE_EVENTS.receive().await);
        }
    }
}
