//! LED feedback contract and a minimal GPIO blink driver.
//!
//! The core requests on/off/blink-cadence changes keyed by a logical
//! LED identifier; what the LEDs physically are is the board's
//! business.  Two logical LEDs exist:
//!
//! - `Status`: solid on while the device is Configured.
//! - `Jiggle`: blinking while a jiggle episode runs - fast cadence
//!   for Work, slow for NoSleep.

/// Logical LED identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedId {
    Status,
    Jiggle,
}

/// Requested LED behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedMode {
    Off,
    On,
    /// Slow blink cadence (NoSleep feedback).
    BlinkSlow,
    /// Fast blink cadence (Work feedback).
    BlinkFast,
}

/// One indicator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedRequest {
    pub led: LedId,
    pub mode: LedMode,
}

/// Run the LED driver over the request channel.
///
/// Blinking LEDs start in the on phase and toggle on their cadence's
/// half-period; requests take effect immediately.
#[cfg(feature = "embedded")]
pub async fn run(
    status_pin: embassy_nrf::gpio::AnyPin,
    jiggle_pin: embassy_nrf::gpio::AnyPin,
) -> ! {
    use crate::config::{LED_BLINK_FAST_MS, LED_BLINK_SLOW_MS};
    use crate::ipc;
    use embassy_nrf::gpio::{Level, Output, OutputDrive};
    use embassy_time::{with_timeout, Duration, Instant};

    // Active-low LEDs on the nRF52840-DK.
    struct Led<'d> {
        out: Output<'d>,
        mode: LedMode,
        lit: bool,
        last_toggle: Instant,
    }

    impl<'d> Led<'d> {
        fn set(&mut self, lit: bool) {
            self.lit = lit;
            if lit {
                self.out.set_low();
            } else {
                self.out.set_high();
            }
        }

        fn apply(&mut self, mode: LedMode) {
            self.mode = mode;
            self.last_toggle = Instant::now();
            self.set(!matches!(mode, LedMode::Off));
        }

        fn half_period(&self) -> Option<u64> {
            match self.mode {
                LedMode::BlinkFast => Some(LED_BLINK_FAST_MS),
                LedMode::BlinkSlow => Some(LED_BLINK_SLOW_MS),
                LedMode::On | LedMode::Off => None,
            }
        }

        fn tick(&mut self) {
            if let Some(half) = self.half_period() {
                if self.last_toggle.elapsed() >= Duration::from_millis(half) {
                    self.last_toggle = Instant::now();
                    let lit = self.lit;
                    self.set(!lit);
                }
            }
        }
    }

    let mut status = Led {
        out: Output::new(status_pin, Level::High, OutputDrive::Standard),
        mode: LedMode::Off,
        lit: false,
        last_toggle: Instant::now(),
    };
    let mut jiggle = Led {
        out: Output::new(jiggle_pin, Level::High, OutputDrive::Standard),
        mode: LedMode::Off,
        lit: false,
        last_toggle: Instant::now(),
    };

    loop {
        match with_timeout(
            Duration::from_millis(LED_BLINK_FAST_MS / 2),
            ipc::LED_REQUESTS.receive(),
        )
        .await
        {
            Ok(request) => match request.led {
                LedId::Status => status.apply(request.mode),
                LedId::Jiggle => jiggle.apply(request.mode),
            },
            Err(_) => {
                status.tick();
                jiggle.tick();
            }
        }
    }
}
