//! Inter-task channels and shared control state.
//!
//! Everything here is created once and lives for the process lifetime;
//! there is no teardown path on a single-purpose always-on device.
//! Producers use `try_send` - a full queue is a counted, non-fatal
//! drop, never a blocked producer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::cancel::{CancelToken, EngineStatus, PauseGate};
use crate::config::{
    BUTTON_EVENT_QUEUE_LEN, KEY_EVENT_QUEUE_LEN, LED_QUEUE_LEN, LINK_EVENT_QUEUE_LEN,
    MOUSE_EVENT_QUEUE_LEN,
};
use crate::event::{ButtonPress, KeyEvent, LinkNotify, MouseEvent};
use crate::indicator::LedRequest;
use crate::jiggle::JiggleCommand;

/// Discrete mouse events awaiting the mouse report assembler.
pub static MOUSE_EVENTS: Channel<CriticalSectionRawMutex, MouseEvent, MOUSE_EVENT_QUEUE_LEN> =
    Channel::new();

/// Discrete key events awaiting the keyboard report assembler.
pub static KEY_EVENTS: Channel<CriticalSectionRawMutex, KeyEvent, KEY_EVENT_QUEUE_LEN> =
    Channel::new();

/// Link-state changes from the transport to the controller.
pub static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkNotify, LINK_EVENT_QUEUE_LEN> =
    Channel::new();

/// Debounced physical-button events to the controller.
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonPress, BUTTON_EVENT_QUEUE_LEN> =
    Channel::new();

/// Indicator requests to the LED subsystem.
pub static LED_REQUESTS: Channel<CriticalSectionRawMutex, LedRequest, LED_QUEUE_LEN> =
    Channel::new();

/// Start gates for the report assemblers, released on the first entry
/// to Configured.  Re-signaling on later entries is harmless.
pub static MOUSE_START: Signal<CriticalSectionRawMutex, ()> = Signal::new();
pub static KEYBOARD_START: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Arm channel of the jiggle engine.
pub static JIGGLE_CMD: Channel<CriticalSectionRawMutex, JiggleCommand, 1> = Channel::new();

/// Cancellation flags: controller writes, engine reads.
pub static JIGGLE_CANCEL: CancelToken = CancelToken::new();

/// Engine dormancy latch: engine writes, controller reads.
pub static JIGGLE_STATUS: EngineStatus = EngineStatus::new();

/// Host-suspend pause for the engine.
pub static JIGGLE_PAUSE: PauseGate = PauseGate::new();

/// Enqueue an LED request, dropping it if the subsystem is behind.
pub fn send_led_request(request: LedRequest) {
    if LED_REQUESTS.try_send(request).is_err() {
        defmt::warn!("LED request queue full");
    }
}
