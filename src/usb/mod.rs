//! USB Device subsystem - presents a composite HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  We create a **composite device** with two HID
//! interfaces:
//!
//! - Interface 0: Keyboard (boot protocol)
//! - Interface 1: Mouse    (boot protocol)
//!
//! The device-state handler is the transport→core notification point:
//! enumeration callbacks become [`LinkNotify`](crate::event::LinkNotify)
//! values on the link-state queue, and the resume callback wakes the
//! sleeping controller.

pub mod device;
pub mod transport;
