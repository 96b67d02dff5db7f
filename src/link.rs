//! Link-State Controller.
//!
//! Tracks the USB enumeration state reported by the transport, gates
//! the report assemblers and the jiggle engine, and drives system
//! sleep entry/exit.  The transition table is a pure function over
//! (state, event, engine activity) returning the next state plus an
//! ordered effect list; the async task multiplexes the link-state and
//! button queues and executes the effects.
//!
//! Any transport signal the table does not model is a fatal condition:
//! the device cannot safely continue on an unmodeled state.

use crate::config::MODE_HOLD_THRESHOLD_MS;
use crate::event::{ButtonPress, LinkNotify};
use crate::jiggle::JiggleMode;

/// USB link state as tracked by the controller.
///
/// `DefaultSuspended` is the pre-enumeration suspend parking state: the
/// bus suspended before the device was ever addressed (e.g. a charging
/// port), where the controller waits a long idle window before
/// committing to true sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Default,
    DefaultSuspended,
    Addressed,
    Configured,
}

/// One input to the controller's multiplexed wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CtlEvent {
    /// Transport link-state change.
    Link(LinkNotify),
    /// Debounced physical-button press.
    Button(ButtonPress),
    /// The state-specific wait timed out (only `DefaultSuspended`
    /// waits with a timeout).
    IdleTimeout,
}

/// Side effect the controller task must execute, in order, before
/// entering the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Turn the status indicator on or off.
    StatusLed(bool),
    /// Release both report assemblers' start gates.
    StartAssemblers,
    /// Force-stop the jiggle engine and wait until it is dormant.
    StopJiggleSync,
    /// Enter system sleep, pausing the jiggle engine around it if it
    /// is active; returns on the transport wake notification.
    SleepPausingJiggle,
    /// Arm the jiggle engine in the given mode.
    ArmJiggle(JiggleMode),
    /// Ask a running jiggle episode to wind down cooperatively.
    RequestJiggleStop,
}

/// Ordered effects of one transition.  No transition produces more
/// than two.
pub type Effects = heapless::Vec<Effect, 4>;

/// A transport signal (or timeout) the current state does not model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnexpectedSignal {
    pub state: LinkState,
    pub event: CtlEvent,
}

/// Jiggle mode selected by a button press of the given duration.
///
/// Strictly longer than the threshold arms Work; at or below
/// (including exactly 500 ms) arms NoSleep.
pub fn mode_for_press(press: ButtonPress) -> JiggleMode {
    if press.held_ms > MODE_HOLD_THRESHOLD_MS {
        JiggleMode::Work
    } else {
        JiggleMode::NoSleep
    }
}

/// The controller's pure transition function.
///
/// `jiggle_active` is the engine's dormancy snapshot at event time;
/// it selects between arming and stopping on a button press and
/// decides whether a de-configuration must synchronously stop the
/// engine.
pub fn transition(
    state: LinkState,
    event: CtlEvent,
    jiggle_active: bool,
) -> Result<(LinkState, Effects), UnexpectedSignal> {
    let mut effects = Effects::new();
    let unexpected = Err(UnexpectedSignal { state, event });

    let next = match state {
        LinkState::Default => match event {
            CtlEvent::Link(LinkNotify::Default) => LinkState::Default,
            CtlEvent::Link(LinkNotify::Addressed) => LinkState::Addressed,
            CtlEvent::Link(LinkNotify::Suspended) => LinkState::DefaultSuspended,
            // Button events are meaningless before enumeration.
            CtlEvent::Button(_) => LinkState::Default,
            _ => return unexpected,
        },

        LinkState::DefaultSuspended => match event {
            CtlEvent::Link(LinkNotify::Default) => LinkState::Default,
            CtlEvent::Button(_) => LinkState::DefaultSuspended,
            CtlEvent::IdleTimeout => {
                // The bus stayed quiet for the whole idle window:
                // commit to true sleep, re-arming in Default on wake.
                let _ = effects.push(Effect::SleepPausingJiggle);
                LinkState::Default
            }
            _ => return unexpected,
        },

        LinkState::Addressed => match event {
            CtlEvent::Link(LinkNotify::Default) => LinkState::Default,
            CtlEvent::Link(LinkNotify::Addressed) => LinkState::Addressed,
            CtlEvent::Link(LinkNotify::Configured) => {
                let _ = effects.push(Effect::StatusLed(true));
                let _ = effects.push(Effect::StartAssemblers);
                LinkState::Configured
            }
            CtlEvent::Link(LinkNotify::Suspended) => {
                let _ = effects.push(Effect::SleepPausingJiggle);
                LinkState::Addressed
            }
            CtlEvent::Button(_) => LinkState::Addressed,
            _ => return unexpected,
        },

        LinkState::Configured => match event {
            CtlEvent::Link(LinkNotify::Default) | CtlEvent::Link(LinkNotify::Addressed) => {
                let _ = effects.push(Effect::StatusLed(false));
                if jiggle_active {
                    // No synthetic input may race the re-enumeration.
                    let _ = effects.push(Effect::StopJiggleSync);
                }
                if event == CtlEvent::Link(LinkNotify::Default) {
                    LinkState::Default
                } else {
                    LinkState::Addressed
                }
            }
            CtlEvent::Link(LinkNotify::Configured) => LinkState::Configured,
            CtlEvent::Link(LinkNotify::Suspended) => {
                let _ = effects.push(Effect::SleepPausingJiggle);
                LinkState::Configured
            }
            CtlEvent::Button(press) => {
                if jiggle_active {
                    let _ = effects.push(Effect::RequestJiggleStop);
                } else {
                    let _ = effects.push(Effect::ArmJiggle(mode_for_press(press)));
                }
                LinkState::Configured
            }
            _ => return unexpected,
        },
    };

    Ok((next, effects))
}

/// Run the Link-State Controller.
#[cfg(feature = "embedded")]
pub async fn run() -> ! {
    use crate::config::SUSPENDED_REARM_TIMEOUT_MS;
    use crate::{ipc, sleep};
    use embassy_futures::select::{select, Either};
    use embassy_futures::yield_now;
    use embassy_time::{with_timeout, Duration};

    let mut state = LinkState::Default;
    loop {
        let event = {
            let wait = select(ipc::LINK_EVENTS.receive(), ipc::BUTTON_EVENTS.receive());
            if state == LinkState::DefaultSuspended {
                match with_timeout(Duration::from_millis(SUSPENDED_REARM_TIMEOUT_MS), wait).await
                {
                    Ok(Either::First(link)) => CtlEvent::Link(link),
                    Ok(Either::Second(press)) => CtlEvent::Button(press),
                    Err(_) => CtlEvent::IdleTimeout,
                }
            } else {
                match wait.await {
                    Either::First(link) => CtlEvent::Link(link),
                    Either::Second(press) => CtlEvent::Button(press),
                }
            }
        };

        let jiggle_active = !ipc::JIGGLE_STATUS.is_dormant();
        match transition(state, event, jiggle_active) {
            Ok((next, effects)) => {
                for effect in effects {
                    execute(effect).await;
                }
                if next != state {
                    defmt::debug!("link: {} -> {}", state, next);
                }
                state = next;
            }
            Err(unexpected) => {
                defmt::panic!(
                    "link: unexpected signal {} in {}",
                    unexpected.event,
                    unexpected.state
                );
            }
        }
    }

    /// Execute one transition effect.
    async fn execute(effect: Effect) {
        use crate::indicator::{LedId, LedMode, LedRequest};

        match effect {
            Effect::StatusLed(on) => {
                let mode = if on { LedMode::On } else { LedMode::Off };
                ipc::send_led_request(LedRequest {
                    led: LedId::Status,
                    mode,
                });
            }
            Effect::StartAssemblers => {
                ipc::MOUSE_START.signal(());
                ipc::KEYBOARD_START.signal(());
            }
            Effect::StopJiggleSync => {
                ipc::JIGGLE_CANCEL.request_force_stop();
                while !ipc::JIGGLE_STATUS.is_dormant() {
                    yield_now().await;
                }
            }
            Effect::SleepPausingJiggle => {
                let pause_jiggle = !ipc::JIGGLE_STATUS.is_dormant();
                if pause_jiggle {
                    ipc::JIGGLE_PAUSE.pause();
                    defmt::info!("jiggle paused for suspend");
                }
                defmt::info!("controller suspended");
                sleep::SLEEPER.enter().await;
                defmt::info!("controller resumed");
                if pause_jiggle {
                    ipc::JIGGLE_PAUSE.resume();
                    defmt::info!("jiggle resumed after wake");
                }
            }
            Effect::ArmJiggle(mode) => {
                if ipc::JIGGLE_CMD
                    .try_send(crate::jiggle::JiggleCommand::Arm(mode))
                    .is_err()
                {
                    defmt::warn!("jiggle arm dropped, engine busy");
                }
            }
            Effect::RequestJiggleStop => {
                ipc::JIGGLE_CANCEL.request_stop();
            }
        }
    }
}
