//! Jiggle Pattern Engine.
//!
//! Once armed by the Link-State Controller, autonomously synthesizes
//! pointer/wheel/click activity in one of two profiles:
//!
//! - `Work`: wheel-scroll bursts with randomized pacing, alternating
//!   direction, with a lateral pointer move and a click between
//!   bursts.  Looks like someone reading and scrolling.
//! - `NoSleep`: a single-unit pointer nudge every ~10 s, direction
//!   alternating.  Just enough to hold off idle timers.
//!
//! Cooperative `stop` is polled at every pacing tick; `force_stop` is
//! additionally polled inside the sweep helpers so the controller can
//! evict the engine within one pointer step.  The pattern geometry is
//! pure and host-testable; only the pacing wrappers touch the clock.

use crate::config::{LATERAL_SPAN, SWEEP_SPAN, WHEEL_JITTER_MASK, WHEEL_MIN_TICKS};
use crate::event::Axis;

/// Timing profile of one jiggle episode, chosen at arm time from the
/// button press duration and immutable until the episode ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JiggleMode {
    Work,
    NoSleep,
}

/// Control message carried by the engine's arm channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JiggleCommand {
    /// Start an episode in the given mode.
    Arm(JiggleMode),
}

/// Pointer deltas of the 4-leg closed-loop diagonal sweep used to
/// wake the host's pointer: out to the south-east and back, step
/// magnitude growing from 1 to `span` per leg.
pub fn diagonal_deltas(span: u8) -> impl Iterator<Item = (i8, i8)> {
    const LEG_SIGNS: [(i8, i8); 4] = [(1, -1), (-1, 1), (-1, -1), (1, 1)];
    LEG_SIGNS.into_iter().flat_map(move |(sx, sy)| {
        (1..=span as i8).map(move |m| (sx * m, sy * m))
    })
}

/// Pointer deltas of a 4-leg single-axis sweep (out, back, back, out)
/// with the same growing step magnitude.
pub fn axis_deltas(axis: Axis, span: u8) -> impl Iterator<Item = (i8, i8)> {
    const LEG_SIGNS: [i8; 4] = [1, -1, -1, 1];
    LEG_SIGNS.into_iter().flat_map(move |s| {
        (1..=span as i8).map(move |m| match axis {
            Axis::X => (s * m, 0),
            Axis::Y => (0, s * m),
        })
    })
}

/// Pacing ticks to wait before the next scroll event: uniform jitter
/// over a fixed window plus a minimum floor, recomputed per event so
/// the scroll stream has no mechanically regular signature.
pub fn jitter_ticks(rng_word: u32) -> u32 {
    (rng_word & WHEEL_JITTER_MASK) + WHEEL_MIN_TICKS
}

/// Run the Jiggle Pattern Engine.
#[cfg(feature = "embedded")]
pub async fn run<R: rand_core::RngCore>(mut rng: R) -> ! {
    use crate::config::{
        BUTTON_PULSE_HOLD_MS, JIGGLE_TICK_MS, NOSLEEP_INTERVAL_TICKS, POINTER_STEP_MS,
        WHEEL_BURST_LEN,
    };
    use crate::event::{MouseButton, MouseEvent};
    use crate::indicator::{LedId, LedMode, LedRequest};
    use crate::{cmd, ipc, stats};
    use embassy_time::Timer;

    /// Enqueue one jiggle-generated mouse event; a full queue is a
    /// counted, non-fatal drop.
    fn emit(event: MouseEvent) {
        if ipc::MOUSE_EVENTS.try_send(event).is_err() {
            stats::STATS.count_jiggle_drop();
        }
    }

    fn jiggle_led(mode: LedMode) {
        ipc::send_led_request(LedRequest {
            led: LedId::Jiggle,
            mode,
        });
    }

    /// Wait `ticks` pacing ticks, honoring pause and cooperative stop.
    /// Returns `true` if the episode should wind down.
    async fn paced_wait(ticks: u32) -> bool {
        for _ in 0..ticks {
            if ipc::JIGGLE_CANCEL.stop_requested() {
                return true;
            }
            ipc::JIGGLE_PAUSE.ready().await;
            Timer::after_millis(JIGGLE_TICK_MS).await;
        }
        false
    }

    /// Emit a pointer sweep, one step per pointer tick.  Bails out
    /// mid-leg on `force_stop`.
    async fn sweep(deltas: impl Iterator<Item = (i8, i8)>) {
        for (dx, dy) in deltas {
            if ipc::JIGGLE_CANCEL.force_stop_requested() {
                return;
            }
            ipc::JIGGLE_PAUSE.ready().await;
            Timer::after_millis(POINTER_STEP_MS).await;
            emit(MouseEvent::Pointer { dx, dy });
        }
    }

    /// One left-button click-and-release pair.
    async fn click_left() {
        if ipc::JIGGLE_CANCEL.force_stop_requested() {
            return;
        }
        emit(MouseEvent::Buttons {
            mask: cmd::BUTTONS.press(MouseButton::Left.mask()),
        });
        Timer::after_millis(BUTTON_PULSE_HOLD_MS).await;
        emit(MouseEvent::Buttons {
            mask: cmd::BUTTONS.release(MouseButton::Left.mask()),
        });
    }

    /// Work profile: alternate wheel direction; per direction emit a
    /// burst of randomly paced scrolls, then a lateral pointer move
    /// and a click.  Returns when `stop` is observed.
    async fn work_loop(rng: &mut impl rand_core::RngCore) {
        let mut wheel: i8 = 1;
        loop {
            wheel = -wheel;
            for _ in 0..WHEEL_BURST_LEN {
                if paced_wait(jitter_ticks(rng.next_u32())).await {
                    return;
                }
                emit(MouseEvent::Wheel { delta: wheel });
            }
            if paced_wait(jitter_ticks(rng.next_u32())).await {
                return;
            }
            sweep(axis_deltas(Axis::X, LATERAL_SPAN)).await;
            if ipc::JIGGLE_CANCEL.stop_requested() {
                return;
            }
            click_left().await;
        }
    }

    /// NoSleep profile: a single-unit horizontal nudge every long
    /// fixed interval, direction alternating.  Returns on `stop`.
    async fn nosleep_loop() {
        let mut dx: i8 = 1;
        loop {
            dx = -dx;
            if paced_wait(NOSLEEP_INTERVAL_TICKS).await {
                return;
            }
            emit(MouseEvent::Pointer { dx, dy: 0 });
        }
    }

    let mut ran_before = false;
    loop {
        // Off: clear the previous episode's cancellation, drop the
        // indicator, park until armed.
        if ran_before {
            defmt::info!("autojig stopped");
            jiggle_led(LedMode::Off);
        }
        ipc::JIGGLE_CANCEL.clear();
        ipc::JIGGLE_STATUS.set_dormant(true);
        let JiggleCommand::Arm(mode) = ipc::JIGGLE_CMD.receive().await;
        ipc::JIGGLE_STATUS.set_dormant(false);
        // A stop that raced the park must not cancel the new episode.
        ipc::JIGGLE_CANCEL.clear();
        ran_before = true;

        // Start: indicator cadence, wake-the-pointer sweep, and a
        // single click when entering Work.
        match mode {
            JiggleMode::Work => jiggle_led(LedMode::BlinkFast),
            JiggleMode::NoSleep => jiggle_led(LedMode::BlinkSlow),
        }
        defmt::info!("autojig started ({})", mode);
        sweep(diagonal_deltas(SWEEP_SPAN)).await;
        if !ipc::JIGGLE_CANCEL.stop_requested() {
            match mode {
                JiggleMode::Work => {
                    click_left().await;
                    work_loop(&mut rng).await;
                }
                JiggleMode::NoSleep => nosleep_loop().await,
            }
        }

        // End: closing sweep returns the pointer influence to a
        // neutral position, then back to Off.
        sweep(axis_deltas(Axis::Y, SWEEP_SPAN)).await;
        sweep(axis_deltas(Axis::X, SWEEP_SPAN)).await;
    }
}
