//! GPIO button input with async debouncing and hold measurement.
//!
//! One physical button (active-low with internal pull-up) selects and
//! starts the jiggle engine; the press *duration* picks the mode, so
//! the event is emitted on release with the measured hold time.

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::event::ButtonPress;
use crate::ipc;
use defmt::{info, warn};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Instant, Timer};

/// Run the jiggle button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, measures the
/// hold until release, then reports the press to the controller.
pub async fn run(pin: AnyPin) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;
        let pressed_at = Instant::now();

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        if btn.is_high() {
            continue;
        }

        // Hold until release, then debounce the rising edge too.
        btn.wait_for_rising_edge().await;
        let held_ms = pressed_at.elapsed().as_millis() as u32;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        info!("button pressed for {} ms", held_ms);
        if ipc::BUTTON_EVENTS.try_send(ButtonPress { held_ms }).is_err() {
            warn!("button event queue full");
        }
    }
}
