//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and pattern
//! constants live here so they can be tuned in one place.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "jigusb";
pub const USB_PRODUCT: &str = "USB Activity Simulator";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms) for both IN endpoints.
pub const USB_HID_POLL_MS: u8 = 10;

/// Backoff before retrying a rejected IN report submission (ms).
pub const SUBMIT_RETRY_BACKOFF_MS: u64 = 500;

// Event queues

/// Mouse event queue depth (pointer/wheel/button events).
pub const MOUSE_EVENT_QUEUE_LEN: usize = 4;

/// Keyboard event queue depth (press/release/modifier events).
pub const KEY_EVENT_QUEUE_LEN: usize = 8;

/// Link-state-change queue depth (transport -> controller).
pub const LINK_EVENT_QUEUE_LEN: usize = 8;

/// Debounced button event queue depth.
pub const BUTTON_EVENT_QUEUE_LEN: usize = 2;

/// LED request queue depth.
pub const LED_QUEUE_LEN: usize = 4;

// Buttons

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Press-duration threshold selecting the jiggle mode (ms).
/// Strictly longer arms Work; at or below arms NoSleep.
pub const MODE_HOLD_THRESHOLD_MS: u32 = 500;

// Command interface

/// Hold time between press and release of a pulsed mouse button (ms).
pub const BUTTON_PULSE_HOLD_MS: u64 = 50;

/// Hold time between press and release of a tapped key (ms).
pub const KEY_TAP_HOLD_MS: u64 = 50;

// Link-State Controller

/// Idle window after which a suspended-before-enumeration device
/// gives up waiting for bus activity and enters true sleep (ms).
pub const SUSPENDED_REARM_TIMEOUT_MS: u64 = 10_000;

// Jiggle pattern

/// Pacing tick for the cancellation-aware wait loops (ms).
pub const JIGGLE_TICK_MS: u64 = 10;

/// Delay between consecutive pointer steps inside a sweep (ms).
pub const POINTER_STEP_MS: u64 = 10;

/// Per-leg step count of the diagonal open/close sweeps.
pub const SWEEP_SPAN: u8 = 14;

/// Per-leg step count of the lateral pointer move between wheel bursts.
pub const LATERAL_SPAN: u8 = 10;

/// Scroll events emitted per wheel direction burst.
pub const WHEEL_BURST_LEN: u32 = 15;

/// Mask applied to the RNG word when computing the pre-scroll wait.
pub const WHEEL_JITTER_MASK: u32 = 0x1FF;

/// Minimum pre-scroll wait, in pacing ticks.
pub const WHEEL_MIN_TICKS: u32 = 50;

/// Ticks between the single-unit pointer nudges in NoSleep mode
/// (1000 x 10 ms = 10 s).
pub const NOSLEEP_INTERVAL_TICKS: u32 = 1000;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Jiggle button  → P0.11 (Button 1)
//   Status LED     → P0.13 (LED 1)
//   Jiggle LED     → P0.14 (LED 2)

/// Blink half-period of the fast (Work mode) LED cadence (ms).
pub const LED_BLINK_FAST_MS: u64 = 100;

/// Blink half-period of the slow (NoSleep mode) LED cadence (ms).
pub const LED_BLINK_SLOW_MS: u64 = 500;
