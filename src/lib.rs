//! jigusb - USB HID activity simulator.
//!
//! The device presents a composite boot-protocol mouse/keyboard to
//! the host, accepts synthetic input events from a command interface,
//! and can autonomously generate plausible mouse/wheel/click activity
//! ("auto-jiggle") to suppress idle/lock behavior.
//!
//! The coordination core (event folding, the link-state and jiggle
//! state machines, cancellation, command validation) is pure and
//! host-testable: `cargo test --lib`.
//!
//! The embedded binary uses main.rs with #![no_std] and #![no_main];
//! everything touching Embassy or the nRF52840 hardware is behind the
//! `embedded` feature.

#![cfg_attr(not(test), no_std)]

pub mod cancel;
pub mod cmd;
pub mod config;
pub mod error;
pub mod event;
pub mod hid;
pub mod jiggle;
pub mod link;
pub mod report;
pub mod stats;

pub mod indicator;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod ipc;
#[cfg(feature = "embedded")]
pub mod sleep;
#[cfg(feature = "embedded")]
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::cancel::{CancelToken, EngineStatus};
    use super::cmd::{self, ButtonState};
    use super::error::{CmdError, SubmitError};
    use super::event::{Axis, KeyEvent, MouseButton, MouseEvent};
    use super::hid::keyboard::{KeyApply, KeyboardReport, KEYBOARD_REPORT_SIZE, KEY_SLOTS};
    use super::hid::mouse::{MouseReport, MOUSE_REPORT_SIZE};
    use super::jiggle::{axis_deltas, diagonal_deltas, jitter_ticks, JiggleMode};
    use super::link::{mode_for_press, transition, CtlEvent, Effect, LinkState};
    use super::report::mouse::{Folded, MouseFold};
    use super::report::{RetryStep, SubmitRetry};
    use super::stats::SubmitCounters;
    use super::event::{ButtonPress, LinkNotify};

    // ════════════════════════════════════════════════════════════════════════
    // Mouse Report Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn mouse_report_new_is_idle() {
        let report = MouseReport::new();
        assert!(report.is_idle());
    }

    #[test]
    fn mouse_report_serialize_layout() {
        let report = MouseReport {
            buttons: 0x05,
            x: -10,
            y: 20,
            wheel: -3,
        };
        let mut buf = [0u8; 4];
        assert_eq!(report.serialize(&mut buf), MOUSE_REPORT_SIZE);
        assert_eq!(buf, [0x05, 0xF6, 0x14, 0xFD]);
    }

    #[test]
    fn mouse_report_serialize_buffer_too_small() {
        let report = MouseReport::new();
        let mut buf = [0u8; 2];
        assert_eq!(report.serialize(&mut buf), 0);
    }

    #[test]
    fn mouse_report_clear_motion_keeps_buttons() {
        let mut report = MouseReport {
            buttons: 0x01,
            x: 5,
            y: -5,
            wheel: 1,
        };
        report.clear_motion();
        assert_eq!(report.buttons, 0x01);
        assert_eq!((report.x, report.y, report.wheel), (0, 0, 0));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Mouse Fold Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn fold_accepts_one_event_of_each_kind() {
        let mut fold = MouseFold::new();
        fold.begin_cycle();
        assert_eq!(
            fold.fold(MouseEvent::Pointer { dx: 3, dy: -2 }),
            Folded::Accepted
        );
        assert_eq!(fold.fold(MouseEvent::Wheel { delta: 1 }), Folded::Accepted);
        assert_eq!(
            fold.fold(MouseEvent::Buttons { mask: 0x01 }),
            Folded::Accepted
        );
        let r = fold.report();
        assert_eq!((r.x, r.y, r.wheel, r.buttons), (3, -2, 1, 0x01));
    }

    #[test]
    fn fold_defers_duplicate_kind() {
        let mut fold = MouseFold::new();
        fold.begin_cycle();
        assert_eq!(
            fold.fold(MouseEvent::Pointer { dx: 3, dy: 0 }),
            Folded::Accepted
        );
        // A second pointer event is deferred, never merged.
        assert_eq!(
            fold.fold(MouseEvent::Pointer { dx: 9, dy: 9 }),
            Folded::Deferred
        );
        assert_eq!(fold.report().x, 3);

        // Deferred event folds cleanly into the next cycle.
        fold.begin_cycle();
        assert_eq!(
            fold.fold(MouseEvent::Pointer { dx: 9, dy: 9 }),
            Folded::Accepted
        );
        assert_eq!((fold.report().x, fold.report().y), (9, 9));
    }

    #[test]
    fn fold_defers_duplicate_wheel_and_button() {
        let mut fold = MouseFold::new();
        fold.begin_cycle();
        assert_eq!(fold.fold(MouseEvent::Wheel { delta: 1 }), Folded::Accepted);
        assert_eq!(fold.fold(MouseEvent::Wheel { delta: -1 }), Folded::Deferred);
        assert_eq!(
            fold.fold(MouseEvent::Buttons { mask: 0x02 }),
            Folded::Accepted
        );
        assert_eq!(
            fold.fold(MouseEvent::Buttons { mask: 0x00 }),
            Folded::Deferred
        );
    }

    #[test]
    fn fold_button_bitmap_persists_across_cycles() {
        let mut fold = MouseFold::new();
        fold.begin_cycle();
        fold.fold(MouseEvent::Buttons { mask: 0x04 });
        fold.begin_cycle();
        // No button event this cycle: the bitmap carries over, the
        // motion fields reset.
        assert_eq!(fold.report().buttons, 0x04);
        assert_eq!(fold.report().x, 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Keyboard Report / Active-Key Set Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn keyboard_press_appends_in_order() {
        let mut report = KeyboardReport::new();
        assert_eq!(report.apply(&KeyEvent::Press(10)), KeyApply::Dirty);
        assert_eq!(report.apply(&KeyEvent::Press(20)), KeyApply::Dirty);
        assert_eq!(report.apply(&KeyEvent::Press(30)), KeyApply::Dirty);
        assert_eq!(report.keycodes, [10, 20, 30, 0, 0, 0]);
    }

    #[test]
    fn keyboard_duplicate_press_is_clean() {
        let mut report = KeyboardReport::new();
        assert_eq!(report.apply(&KeyEvent::Press(30)), KeyApply::Dirty);
        assert_eq!(report.apply(&KeyEvent::Press(30)), KeyApply::Clean);
        assert_eq!(report.pressed_count(), 1);
    }

    #[test]
    fn keyboard_press_overflow_leaves_set_unchanged() {
        let mut report = KeyboardReport::new();
        for code in 1..=KEY_SLOTS as u8 {
            assert_eq!(report.apply(&KeyEvent::Press(code)), KeyApply::Dirty);
        }
        assert_eq!(report.apply(&KeyEvent::Press(99)), KeyApply::Overflow);
        assert_eq!(report.pressed_count(), KEY_SLOTS);
        assert!(!report.is_pressed(99));
    }

    #[test]
    fn keyboard_release_preserves_relative_order() {
        let mut report = KeyboardReport::new();
        for code in [10, 20, 30, 40] {
            report.apply(&KeyEvent::Press(code));
        }
        assert_eq!(report.apply(&KeyEvent::Release(20)), KeyApply::Dirty);
        assert_eq!(report.keycodes, [10, 30, 40, 0, 0, 0]);
    }

    #[test]
    fn keyboard_release_inactive_is_clean() {
        let mut report = KeyboardReport::new();
        report.apply(&KeyEvent::Press(10));
        assert_eq!(report.apply(&KeyEvent::Release(77)), KeyApply::Clean);
        assert_eq!(report.keycodes, [10, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn keyboard_modifier_set_dirty_only_on_change() {
        let mut report = KeyboardReport::new();
        assert_eq!(report.apply(&KeyEvent::SetModifiers(0x02)), KeyApply::Dirty);
        assert_eq!(report.apply(&KeyEvent::SetModifiers(0x02)), KeyApply::Clean);
        assert_eq!(report.apply(&KeyEvent::SetModifiers(0x00)), KeyApply::Dirty);
    }

    #[test]
    fn keyboard_press_press_release_dirties_once_per_transition() {
        let mut report = KeyboardReport::new();
        assert_eq!(report.apply(&KeyEvent::Press(30)), KeyApply::Dirty);
        assert_eq!(report.apply(&KeyEvent::Press(30)), KeyApply::Clean);
        assert_eq!(report.apply(&KeyEvent::Release(30)), KeyApply::Dirty);
        assert_eq!(report.apply(&KeyEvent::Release(30)), KeyApply::Clean);
        assert_eq!(report.pressed_count(), 0);
    }

    #[test]
    fn keyboard_serialize_layout() {
        let mut report = KeyboardReport::new();
        report.apply(&KeyEvent::SetModifiers(0x05));
        report.apply(&KeyEvent::Press(0x04));
        report.apply(&KeyEvent::Press(0x05));
        let mut buf = [0u8; 8];
        assert_eq!(report.serialize(&mut buf), KEYBOARD_REPORT_SIZE);
        assert_eq!(buf, [0x05, 0x00, 0x04, 0x05, 0x00, 0x00, 0x00, 0x00]);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Submission Retry Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn retry_counts_transient_rejections_then_success() {
        let counters = SubmitCounters::new();
        let retry = SubmitRetry::new(&counters);
        for _ in 0..3 {
            assert_eq!(
                retry.on_result(Err(SubmitError::EndpointNotReady)),
                RetryStep::Backoff
            );
        }
        assert_eq!(retry.on_result(Ok(())), RetryStep::Done);

        let snap = counters.snapshot();
        assert_eq!(snap.not_ready, 3);
        assert_eq!(snap.ok, 1);
        assert_eq!(snap.interrupted, 0);
    }

    #[test]
    fn retry_counts_interrupted_independently() {
        let counters = SubmitCounters::new();
        let retry = SubmitRetry::new(&counters);
        assert_eq!(
            retry.on_result(Err(SubmitError::Interrupted)),
            RetryStep::Backoff
        );
        assert_eq!(counters.snapshot().interrupted, 1);
        assert_eq!(counters.snapshot().not_ready, 0);
    }

    #[test]
    fn retry_fatal_is_not_counted_or_retried() {
        let counters = SubmitCounters::new();
        let retry = SubmitRetry::new(&counters);
        assert_eq!(retry.on_result(Err(SubmitError::Fatal)), RetryStep::Fatal);
        assert_eq!(counters.snapshot(), Default::default());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Link-State Controller Tests
    // ════════════════════════════════════════════════════════════════════════

    fn link(n: LinkNotify) -> CtlEvent {
        CtlEvent::Link(n)
    }

    fn press(held_ms: u32) -> CtlEvent {
        CtlEvent::Button(ButtonPress { held_ms })
    }

    #[test]
    fn default_follows_enumeration() {
        let (s, fx) = transition(LinkState::Default, link(LinkNotify::Addressed), false).unwrap();
        assert_eq!(s, LinkState::Addressed);
        assert!(fx.is_empty());

        let (s, _) = transition(LinkState::Default, link(LinkNotify::Default), false).unwrap();
        assert_eq!(s, LinkState::Default);

        let (s, _) = transition(LinkState::Default, link(LinkNotify::Suspended), false).unwrap();
        assert_eq!(s, LinkState::DefaultSuspended);
    }

    #[test]
    fn default_rejects_configured_signal() {
        assert!(transition(LinkState::Default, link(LinkNotify::Configured), false).is_err());
    }

    #[test]
    fn default_discards_button_events() {
        let (s, fx) = transition(LinkState::Default, press(800), false).unwrap();
        assert_eq!(s, LinkState::Default);
        assert!(fx.is_empty());
    }

    #[test]
    fn default_suspended_returns_on_bus_activity() {
        let (s, fx) =
            transition(LinkState::DefaultSuspended, link(LinkNotify::Default), false).unwrap();
        assert_eq!(s, LinkState::Default);
        assert!(fx.is_empty());
    }

    #[test]
    fn default_suspended_sleeps_after_idle_window() {
        let (s, fx) = transition(LinkState::DefaultSuspended, CtlEvent::IdleTimeout, false).unwrap();
        assert_eq!(s, LinkState::Default);
        assert_eq!(fx.as_slice(), &[Effect::SleepPausingJiggle]);
    }

    #[test]
    fn default_suspended_drains_buttons_and_rejects_others() {
        let (s, fx) = transition(LinkState::DefaultSuspended, press(100), false).unwrap();
        assert_eq!(s, LinkState::DefaultSuspended);
        assert!(fx.is_empty());

        assert!(
            transition(LinkState::DefaultSuspended, link(LinkNotify::Configured), false).is_err()
        );
    }

    #[test]
    fn addressed_configures_with_led_and_assembler_start() {
        let (s, fx) = transition(LinkState::Addressed, link(LinkNotify::Configured), false).unwrap();
        assert_eq!(s, LinkState::Configured);
        assert_eq!(
            fx.as_slice(),
            &[Effect::StatusLed(true), Effect::StartAssemblers]
        );
    }

    #[test]
    fn addressed_suspend_sleeps_in_place() {
        let (s, fx) = transition(LinkState::Addressed, link(LinkNotify::Suspended), false).unwrap();
        assert_eq!(s, LinkState::Addressed);
        assert_eq!(fx.as_slice(), &[Effect::SleepPausingJiggle]);
    }

    #[test]
    fn configured_deconfiguration_stops_active_jiggle_synchronously() {
        let (s, fx) = transition(LinkState::Configured, link(LinkNotify::Default), true).unwrap();
        assert_eq!(s, LinkState::Default);
        assert_eq!(
            fx.as_slice(),
            &[Effect::StatusLed(false), Effect::StopJiggleSync]
        );

        let (s, fx) = transition(LinkState::Configured, link(LinkNotify::Addressed), false).unwrap();
        assert_eq!(s, LinkState::Addressed);
        assert_eq!(fx.as_slice(), &[Effect::StatusLed(false)]);
    }

    #[test]
    fn configured_repeat_signal_is_a_noop() {
        let (s, fx) = transition(LinkState::Configured, link(LinkNotify::Configured), true).unwrap();
        assert_eq!(s, LinkState::Configured);
        assert!(fx.is_empty());
    }

    #[test]
    fn configured_suspend_resumes_configured() {
        let (s, fx) = transition(LinkState::Configured, link(LinkNotify::Suspended), true).unwrap();
        assert_eq!(s, LinkState::Configured);
        assert_eq!(fx.as_slice(), &[Effect::SleepPausingJiggle]);
    }

    #[test]
    fn configured_button_arms_dormant_engine() {
        let (s, fx) = transition(LinkState::Configured, press(800), false).unwrap();
        assert_eq!(s, LinkState::Configured);
        assert_eq!(fx.as_slice(), &[Effect::ArmJiggle(JiggleMode::Work)]);
    }

    #[test]
    fn configured_button_stops_running_engine() {
        let (_, fx) = transition(LinkState::Configured, press(100), true).unwrap();
        assert_eq!(fx.as_slice(), &[Effect::RequestJiggleStop]);
    }

    #[test]
    fn mode_threshold_is_exclusive_at_500ms() {
        assert_eq!(mode_for_press(ButtonPress { held_ms: 499 }), JiggleMode::NoSleep);
        assert_eq!(mode_for_press(ButtonPress { held_ms: 500 }), JiggleMode::NoSleep);
        assert_eq!(mode_for_press(ButtonPress { held_ms: 501 }), JiggleMode::Work);
    }

    #[test]
    fn timeout_outside_default_suspended_is_fatal() {
        assert!(transition(LinkState::Default, CtlEvent::IdleTimeout, false).is_err());
        assert!(transition(LinkState::Addressed, CtlEvent::IdleTimeout, false).is_err());
        assert!(transition(LinkState::Configured, CtlEvent::IdleTimeout, false).is_err());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Jiggle Pattern Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn diagonal_sweep_has_four_growing_legs() {
        let steps: Vec<(i8, i8)> = diagonal_deltas(3).collect();
        assert_eq!(
            steps,
            [
                (1, -1),
                (2, -2),
                (3, -3),
                (-1, 1),
                (-2, 2),
                (-3, 3),
                (-1, -1),
                (-2, -2),
                (-3, -3),
                (1, 1),
                (2, 2),
                (3, 3),
            ]
        );
    }

    #[test]
    fn diagonal_sweep_is_a_closed_loop() {
        let (dx, dy) = diagonal_deltas(14)
            .fold((0i32, 0i32), |(x, y), (dx, dy)| (x + dx as i32, y + dy as i32));
        assert_eq!((dx, dy), (0, 0));
    }

    #[test]
    fn axis_sweep_moves_only_the_chosen_axis() {
        assert!(axis_deltas(Axis::X, 10).all(|(_, dy)| dy == 0));
        assert!(axis_deltas(Axis::Y, 10).all(|(dx, _)| dx == 0));
    }

    #[test]
    fn axis_sweep_is_a_closed_loop_of_four_legs() {
        let steps: Vec<(i8, i8)> = axis_deltas(Axis::X, 2).collect();
        assert_eq!(
            steps,
            [(1, 0), (2, 0), (-1, 0), (-2, 0), (-1, 0), (-2, 0), (1, 0), (2, 0)]
        );
        let sum: i32 = axis_deltas(Axis::X, 14).map(|(dx, _)| dx as i32).sum();
        assert_eq!(sum, 0);
    }

    #[test]
    fn jitter_ticks_is_floored_and_masked() {
        assert_eq!(jitter_ticks(0), 50);
        assert_eq!(jitter_ticks(0x1FF), 0x1FF + 50);
        // High bits beyond the mask do not widen the window.
        assert_eq!(jitter_ticks(0xFFFF_FE00), 50);
        assert_eq!(jitter_ticks(0xFFFF_FFFF), 0x1FF + 50);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Cancellation Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn cooperative_stop_does_not_imply_forced() {
        let token = CancelToken::new();
        token.request_stop();
        assert!(token.stop_requested());
        assert!(!token.force_stop_requested());
    }

    #[test]
    fn forced_stop_implies_cooperative() {
        let token = CancelToken::new();
        token.request_force_stop();
        assert!(token.stop_requested());
        assert!(token.force_stop_requested());
        token.clear();
        assert!(!token.stop_requested());
        assert!(!token.force_stop_requested());
    }

    #[test]
    fn engine_starts_dormant() {
        let status = EngineStatus::new();
        assert!(status.is_dormant());
        status.set_dormant(false);
        assert!(!status.is_dormant());
    }

    #[test]
    fn forced_stop_aborts_a_sweep_mid_leg() {
        // Mirrors the engine's sweep loop: force_stop is polled before
        // every step, so the walk ends before all four legs complete.
        let token = CancelToken::new();
        let mut emitted = 0;
        for (_dx, _dy) in diagonal_deltas(14) {
            if token.force_stop_requested() {
                break;
            }
            emitted += 1;
            if emitted == 5 {
                token.request_force_stop();
            }
        }
        assert_eq!(emitted, 5);
        assert!(emitted < diagonal_deltas(14).count());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Command Validation Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn pointer_command_maps_axis_and_validates_range() {
        assert_eq!(
            cmd::pointer_event(Axis::X, 5).unwrap(),
            MouseEvent::Pointer { dx: 5, dy: 0 }
        );
        assert_eq!(
            cmd::pointer_event(Axis::Y, -127).unwrap(),
            MouseEvent::Pointer { dx: 0, dy: -127 }
        );
        assert_eq!(cmd::pointer_event(Axis::X, 128), Err(CmdError::OutOfRange));
        assert_eq!(cmd::pointer_event(Axis::Y, -128), Err(CmdError::OutOfRange));
    }

    #[test]
    fn wheel_command_validates_range() {
        assert_eq!(
            cmd::wheel_event(127).unwrap(),
            MouseEvent::Wheel { delta: 127 }
        );
        assert_eq!(cmd::wheel_event(200), Err(CmdError::OutOfRange));
    }

    #[test]
    fn key_code_range_is_1_to_101() {
        assert_eq!(cmd::validate_key_code(0), Err(CmdError::OutOfRange));
        assert_eq!(cmd::validate_key_code(1), Ok(1));
        assert_eq!(cmd::validate_key_code(101), Ok(101));
        assert_eq!(cmd::validate_key_code(102), Err(CmdError::OutOfRange));
    }

    #[test]
    fn button_state_tracks_full_bitmap() {
        let buttons = ButtonState::new();
        assert_eq!(buttons.press(MouseButton::Left.mask()), 0x01);
        assert_eq!(buttons.press(MouseButton::Middle.mask()), 0x05);
        assert_eq!(buttons.release(MouseButton::Left.mask()), 0x04);
        assert_eq!(buttons.get(), 0x04);
        // Releasing an unpressed button is harmless.
        assert_eq!(buttons.release(MouseButton::Right.mask()), 0x04);
    }
}
