//! Integration tests for the jigusb host-testable coordination core.
//!
//! These drive the pure fold/state-machine layers the way the tasks
//! do, without the async runtime: the loops below mirror the task
//! bodies' control flow step for step.

use jigusb::event::{ButtonPress, KeyEvent, LinkNotify, MouseEvent};
use jigusb::hid::keyboard::{KeyApply, KeyboardReport};
use jigusb::hid::mouse::MouseReport;
use jigusb::jiggle::JiggleMode;
use jigusb::link::{transition, CtlEvent, Effect, LinkState};
use jigusb::report::mouse::{Folded, MouseFold};

/// Replicates the mouse assembler's cycle loop over a fixed event
/// sequence: drain through the fold, snapshot the report, carry a
/// deferred event into the next cycle.
fn run_mouse_cycles(events: &[MouseEvent]) -> Vec<MouseReport> {
    let mut fold = MouseFold::new();
    let mut carry: Option<MouseEvent> = None;
    let mut queue = events.iter().copied();
    let mut reports = Vec::new();

    loop {
        fold.begin_cycle();
        if let Some(event) = carry.take() {
            let _ = fold.fold(event);
        }
        while carry.is_none() {
            match queue.next() {
                Some(event) => {
                    if fold.fold(event) == Folded::Deferred {
                        carry = Some(event);
                    }
                }
                None => break,
            }
        }
        reports.push(*fold.report());
        if carry.is_none() {
            return reports;
        }
    }
}

#[test]
fn burst_of_mixed_events_becomes_one_report() {
    let reports = run_mouse_cycles(&[
        MouseEvent::Pointer { dx: 4, dy: -4 },
        MouseEvent::Wheel { delta: 1 },
        MouseEvent::Buttons { mask: 0x01 },
    ]);
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0],
        MouseReport {
            buttons: 0x01,
            x: 4,
            y: -4,
            wheel: 1
        }
    );
}

#[test]
fn duplicate_kind_events_split_into_consecutive_reports() {
    let reports = run_mouse_cycles(&[
        MouseEvent::Pointer { dx: 1, dy: 0 },
        MouseEvent::Pointer { dx: 2, dy: 0 },
        MouseEvent::Pointer { dx: 3, dy: 0 },
    ]);
    // Three same-kind events: one report each, order preserved,
    // nothing merged or dropped.
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].x, 1);
    assert_eq!(reports[1].x, 2);
    assert_eq!(reports[2].x, 3);
}

#[test]
fn deferral_keeps_later_kinds_out_of_the_current_report() {
    let reports = run_mouse_cycles(&[
        MouseEvent::Wheel { delta: 1 },
        MouseEvent::Wheel { delta: -1 },
        MouseEvent::Buttons { mask: 0x02 },
    ]);
    // The second wheel defers; draining stops there, so the button
    // lands in the second cycle with the deferred wheel.
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].wheel, 1);
    assert_eq!(reports[0].buttons, 0);
    assert_eq!(reports[1].wheel, -1);
    assert_eq!(reports[1].buttons, 0x02);
}

#[test]
fn click_pair_reports_press_then_release() {
    let reports = run_mouse_cycles(&[
        MouseEvent::Buttons { mask: 0x01 },
        MouseEvent::Buttons { mask: 0x00 },
    ]);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].buttons, 0x01);
    assert_eq!(reports[1].buttons, 0x00);
}

/// Replicates the keyboard assembler's inner loop: absorb events
/// until one dirties the report, count the submissions.
#[test]
fn keyboard_stream_submits_once_per_distinct_transition() {
    let events = [
        KeyEvent::Press(30),
        KeyEvent::Press(30), // duplicate - absorbed
        KeyEvent::Release(30),
        KeyEvent::Release(30), // inactive - absorbed
    ];
    let mut report = KeyboardReport::new();
    let mut submissions = 0;
    for event in &events {
        match report.apply(event) {
            KeyApply::Dirty => submissions += 1,
            KeyApply::Clean | KeyApply::Overflow => {}
        }
    }
    assert_eq!(submissions, 2);
    assert_eq!(report.pressed_count(), 0);
}

#[test]
fn full_enumeration_and_jiggle_lifecycle() {
    // Plug in: Default -> Addressed -> Configured.
    let (s, _) = transition(
        LinkState::Default,
        CtlEvent::Link(LinkNotify::Addressed),
        false,
    )
    .unwrap();
    let (s, fx) = transition(s, CtlEvent::Link(LinkNotify::Configured), false).unwrap();
    assert_eq!(s, LinkState::Configured);
    assert_eq!(
        fx.as_slice(),
        &[Effect::StatusLed(true), Effect::StartAssemblers]
    );

    // Long press arms Work mode.
    let (s, fx) = transition(s, CtlEvent::Button(ButtonPress { held_ms: 900 }), false).unwrap();
    assert_eq!(fx.as_slice(), &[Effect::ArmJiggle(JiggleMode::Work)]);

    // Host suspends mid-episode: sleep wraps around the engine pause.
    let (s, fx) = transition(s, CtlEvent::Link(LinkNotify::Suspended), true).unwrap();
    assert_eq!(s, LinkState::Configured);
    assert_eq!(fx.as_slice(), &[Effect::SleepPausingJiggle]);

    // Unplug while the engine still runs: indicator off, forced
    // synchronous stop, back to Default.
    let (s, fx) = transition(s, CtlEvent::Link(LinkNotify::Default), true).unwrap();
    assert_eq!(s, LinkState::Default);
    assert_eq!(
        fx.as_slice(),
        &[Effect::StatusLed(false), Effect::StopJiggleSync]
    );
}

#[test]
fn short_press_arms_nosleep_and_second_press_stops() {
    let (s, fx) = transition(
        LinkState::Configured,
        CtlEvent::Button(ButtonPress { held_ms: 200 }),
        false,
    )
    .unwrap();
    assert_eq!(s, LinkState::Configured);
    assert_eq!(fx.as_slice(), &[Effect::ArmJiggle(JiggleMode::NoSleep)]);

    // With the engine now active, the next press requests a
    // cooperative stop instead of re-arming.
    let (_, fx) = transition(
        LinkState::Configured,
        CtlEvent::Button(ButtonPress { held_ms: 200 }),
        true,
    )
    .unwrap();
    assert_eq!(fx.as_slice(), &[Effect::RequestJiggleStop]);
}
