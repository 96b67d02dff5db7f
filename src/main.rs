//! jigusb embedded entry point (nRF52840).
//!
//! Brings up the USB composite HID device and spawns the fixed task
//! set: USB stack, the two report assemblers, the Link-State
//! Controller, the jiggle engine, the jiggle button, and the LED
//! driver.  No task is created or destroyed after startup.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::rng::Rng;
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::Timer;

use jigusb::indicator::{LedId, LedMode, LedRequest};
use jigusb::usb::device::{self, UsbDriver, UsbHidDevice};
use jigusb::usb::transport::UsbReportSink;
use jigusb::{buttons, indicator, ipc, jiggle, link, report};

bind_interrupts!(struct Irqs {
    RNG => embassy_nrf::rng::InterruptHandler<peripherals::RNG>;
});

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn mouse_report_task(mut sink: UsbReportSink) -> ! {
    report::mouse::run(&mut sink).await
}

#[embassy_executor::task]
async fn keyboard_report_task(mut sink: UsbReportSink) -> ! {
    report::keyboard::run(&mut sink).await
}

#[embassy_executor::task]
async fn controller_task() -> ! {
    link::run().await
}

#[embassy_executor::task]
async fn jiggle_task(rng: Rng<'static, peripherals::RNG>) -> ! {
    jiggle::run(rng).await
}

#[embassy_executor::task]
async fn button_task(pin: AnyPin) -> ! {
    buttons::run(pin).await
}

#[embassy_executor::task]
async fn indicator_task(status_pin: AnyPin, jiggle_pin: AnyPin) -> ! {
    indicator::run(status_pin, jiggle_pin).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("jigusb starting");

    let UsbHidDevice {
        device,
        keyboard_writer,
        mouse_writer,
    } = device::init(p.USBD);
    let rng = Rng::new(p.RNG, Irqs);

    unwrap!(spawner.spawn(usb_task(device)));
    unwrap!(spawner.spawn(mouse_report_task(UsbReportSink::new(mouse_writer))));
    unwrap!(spawner.spawn(keyboard_report_task(UsbReportSink::new(keyboard_writer))));
    unwrap!(spawner.spawn(controller_task()));
    unwrap!(spawner.spawn(jiggle_task(rng)));
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade())));
    unwrap!(spawner.spawn(indicator_task(p.P0_13.degrade(), p.P0_14.degrade())));

    // Boot blink: confirm the firmware is up before enumeration.
    ipc::send_led_request(LedRequest {
        led: LedId::Status,
        mode: LedMode::On,
    });
    Timer::after_millis(150).await;
    ipc::send_led_request(LedRequest {
        led: LedId::Status,
        mode: LedMode::Off,
    });
}
