//! Discrete input events carried by the inter-task queues, plus the
//! transport- and button-facing notification payloads.
//!
//! Every button event carries the *full* post-change bitmap, not a
//! delta, so the report assemblers never need prior state.

/// Smallest pointer/wheel delta a single event can carry.
pub const DELTA_MIN: i32 = -127;

/// Largest pointer/wheel delta a single event can carry.
pub const DELTA_MAX: i32 = 127;

/// First valid HID key code; 0 is reserved as "no key".
pub const KEY_CODE_MIN: u8 = 1;

/// Last key code accepted by the command interface.
pub const KEY_CODE_MAX: u8 = 101;

/// Pointer axis selector for single-axis commands and sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

/// Mouse buttons, as bits of the report bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Bit of this button in the report bitmap.
    pub const fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 0x01,
            MouseButton::Right => 0x02,
            MouseButton::Middle => 0x04,
        }
    }
}

/// One discrete mouse input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseEvent {
    /// Relative pointer movement.
    Pointer { dx: i8, dy: i8 },
    /// Scroll wheel detents.
    Wheel { delta: i8 },
    /// Full button bitmap after a press/release.
    Buttons { mask: u8 },
}

/// One discrete keyboard input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Key with the given code went down.
    Press(u8),
    /// Key with the given code went up.
    Release(u8),
    /// Replace the modifier bitmap.
    SetModifiers(u8),
}

/// USB enumeration state change, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkNotify {
    /// Bus reset - back to the default (unaddressed) state.
    Default,
    /// Host assigned a device address.
    Addressed,
    /// Host selected a configuration; endpoints are live.
    Configured,
    /// Host suspended the bus.
    Suspended,
}

/// Debounced physical-button event with measured hold duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonPress {
    /// How long the button was held down, in milliseconds.
    pub held_ms: u32,
}
