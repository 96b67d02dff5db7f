//! USB HID boot-protocol report types and descriptors.
//!
//! Two interfaces are exposed to the host:
//!
//! - Interface 0: Keyboard (boot protocol, 8-byte report)
//! - Interface 1: Mouse    (boot protocol, 4-byte report)
//!
//! The keyboard report doubles as the cross-report *active-key set*:
//! the keyboard assembler mutates it in place and serialises a
//! snapshot per submission.

pub mod keyboard;
pub mod mouse;
