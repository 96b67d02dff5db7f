//! USB HID keyboard report (boot protocol compatible) and the
//! active-key-set operations the keyboard assembler runs on it.
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```
//!
//! The key array is kept packed: active codes occupy a prefix in
//! insertion order, followed by zeros.  Releasing a key compacts the
//! remainder without reordering it.

use crate::event::KeyEvent;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Simultaneous non-modifier keys the boot report can carry.
pub const KEY_SLOTS: usize = 6;

/// Outcome of applying one key event to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyApply {
    /// The report changed and must be submitted.
    Dirty,
    /// The event was absorbed without changing the report.
    Clean,
    /// A press was dropped because all key slots are occupied.
    Overflow,
}

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Active key codes, packed in insertion order.
    pub keycodes: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn new() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; KEY_SLOTS],
        }
    }

    /// Returns `true` if the given code is in the active set.
    pub fn is_pressed(&self, code: u8) -> bool {
        for &k in self.keycodes.iter() {
            if k == 0 {
                return false;
            }
            if k == code {
                return true;
            }
        }
        false
    }

    /// Number of codes currently in the active set.
    pub fn pressed_count(&self) -> usize {
        self.keycodes.iter().take_while(|&&k| k != 0).count()
    }

    /// Apply one key event to the report.
    ///
    /// - `Press`: appended to the first free slot; a duplicate press
    ///   is absorbed, a press with all slots occupied is `Overflow`.
    /// - `Release`: compacts the remaining codes preserving their
    ///   relative order; releasing an inactive code is absorbed.
    /// - `SetModifiers`: replaces the modifier byte if it differs.
    pub fn apply(&mut self, event: &KeyEvent) -> KeyApply {
        match *event {
            KeyEvent::Press(code) => {
                if self.is_pressed(code) {
                    return KeyApply::Clean;
                }
                for slot in self.keycodes.iter_mut() {
                    if *slot == 0 {
                        *slot = code;
                        return KeyApply::Dirty;
                    }
                }
                KeyApply::Overflow
            }
            KeyEvent::Release(code) => {
                if !self.is_pressed(code) {
                    return KeyApply::Clean;
                }
                let mut packed = [0u8; KEY_SLOTS];
                let mut n = 0;
                for &k in self.keycodes.iter() {
                    if k == 0 {
                        break;
                    }
                    if k != code {
                        packed[n] = k;
                        n += 1;
                    }
                }
                self.keycodes = packed;
                KeyApply::Dirty
            }
            KeyEvent::SetModifiers(bitmap) => {
                if bitmap == self.modifier {
                    return KeyApply::Clean;
                }
                self.modifier = bitmap;
                KeyApply::Dirty
            }
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 8).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }
}

// USB HID report descriptor for a boot-protocol keyboard

/// USB HID Report Descriptor for a standard keyboard.
///
/// This descriptor tells the USB host that we are a keyboard with:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input)
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];
