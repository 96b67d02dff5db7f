//! Synthetic-input command interface.
//!
//! A validated, fire-and-forget layer over the event queues, consumed
//! by whatever front end parses operator input (the line parser itself
//! lives outside the core).  Every call either enqueues successfully
//! or reports an error; the caller is never blocked.
//!
//! The cumulative mouse-button bitmap lives here: button commands and
//! the jiggle engine's clicks both go through [`BUTTONS`], so every
//! button event carries the full post-change state.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::error::CmdError;
use crate::event::{Axis, MouseEvent, DELTA_MAX, DELTA_MIN, KEY_CODE_MAX, KEY_CODE_MIN};

/// Shared cumulative mouse-button bitmap.
pub struct ButtonState(AtomicU8);

impl ButtonState {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// Set the given button bits; returns the new full bitmap.
    pub fn press(&self, mask: u8) -> u8 {
        self.0.fetch_or(mask, Ordering::SeqCst) | mask
    }

    /// Clear the given button bits; returns the new full bitmap.
    pub fn release(&self, mask: u8) -> u8 {
        self.0.fetch_and(!mask, Ordering::SeqCst) & !mask
    }

    /// Current bitmap.
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Process-wide button bitmap, shared by the command layer and the
/// jiggle engine's click helper.
pub static BUTTONS: ButtonState = ButtonState::new();

/// Build a single-axis pointer event, validating the delta.
pub fn pointer_event(axis: Axis, delta: i32) -> Result<MouseEvent, CmdError> {
    if !(DELTA_MIN..=DELTA_MAX).contains(&delta) {
        return Err(CmdError::OutOfRange);
    }
    let delta = delta as i8;
    Ok(match axis {
        Axis::X => MouseEvent::Pointer { dx: delta, dy: 0 },
        Axis::Y => MouseEvent::Pointer { dx: 0, dy: delta },
    })
}

/// Build a wheel event, validating the delta.
pub fn wheel_event(delta: i32) -> Result<MouseEvent, CmdError> {
    if !(DELTA_MIN..=DELTA_MAX).contains(&delta) {
        return Err(CmdError::OutOfRange);
    }
    Ok(MouseEvent::Wheel { delta: delta as i8 })
}

/// Validate a key code against the accepted range [1, 101].
pub fn validate_key_code(code: u16) -> Result<u8, CmdError> {
    if code < KEY_CODE_MIN as u16 || code > KEY_CODE_MAX as u16 {
        return Err(CmdError::OutOfRange);
    }
    Ok(code as u8)
}

#[cfg(feature = "embedded")]
mod send {
    use super::*;
    use crate::config::{BUTTON_PULSE_HOLD_MS, KEY_TAP_HOLD_MS};
    use crate::event::{KeyEvent, MouseButton};
    use crate::ipc;
    use embassy_time::Timer;

    fn send_mouse(event: MouseEvent) -> Result<(), CmdError> {
        ipc::MOUSE_EVENTS
            .try_send(event)
            .map_err(|_| CmdError::QueueFull)
    }

    fn send_key(event: KeyEvent) -> Result<(), CmdError> {
        ipc::KEY_EVENTS
            .try_send(event)
            .map_err(|_| CmdError::QueueFull)
    }

    /// Enqueue a single-axis pointer movement.
    pub fn pointer(axis: Axis, delta: i32) -> Result<(), CmdError> {
        send_mouse(pointer_event(axis, delta)?)
    }

    /// Enqueue a wheel movement.
    pub fn wheel(delta: i32) -> Result<(), CmdError> {
        send_mouse(wheel_event(delta)?)
    }

    /// Press or release one mouse button.
    pub fn button(button: MouseButton, pressed: bool) -> Result<(), CmdError> {
        let mask = if pressed {
            BUTTONS.press(button.mask())
        } else {
            BUTTONS.release(button.mask())
        };
        send_mouse(MouseEvent::Buttons { mask })
    }

    /// Press one mouse button and release it after a short hold.
    ///
    /// If the press cannot be enqueued the bitmap is reverted and no
    /// release is scheduled.
    pub async fn button_pulse(button: MouseButton) -> Result<(), CmdError> {
        let mask = BUTTONS.press(button.mask());
        if let Err(e) = send_mouse(MouseEvent::Buttons { mask }) {
            BUTTONS.release(button.mask());
            return Err(e);
        }
        Timer::after_millis(BUTTON_PULSE_HOLD_MS).await;
        let mask = BUTTONS.release(button.mask());
        send_mouse(MouseEvent::Buttons { mask })
    }

    /// Enqueue a key press.
    pub fn key_press(code: u16) -> Result<(), CmdError> {
        send_key(KeyEvent::Press(validate_key_code(code)?))
    }

    /// Enqueue a key release.
    pub fn key_release(code: u16) -> Result<(), CmdError> {
        send_key(KeyEvent::Release(validate_key_code(code)?))
    }

    /// Replace the modifier bitmap.
    pub fn set_modifiers(bitmap: u8) -> Result<(), CmdError> {
        send_key(KeyEvent::SetModifiers(bitmap))
    }

    /// Press one key and release it after a short hold.
    pub async fn key_tap(code: u16) -> Result<(), CmdError> {
        let code = validate_key_code(code)?;
        send_key(KeyEvent::Press(code))?;
        Timer::after_millis(KEY_TAP_HOLD_MS).await;
        send_key(KeyEvent::Release(code))
    }
}

#[cfg(feature = "embedded")]
pub use send::*;
