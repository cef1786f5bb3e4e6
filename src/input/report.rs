//! Raw Report Layouts
//!
//! Reports carry no framing of their own. The transport tags each one with
//! the HID application collection it came from, and the payload length
//! selects one of a few fixed field layouts.
//!
//! # Mouse reports
//!
//! ```text
//! len  buttons  x (LE i16)  y (LE i16)  wheel (i8)
//!  9   [1]      [3..5]      [5..7]      [7]
//! 13   [0]      [2..4]      [4..6]      [6]
//! ```
//!
//! # Keyboard reports
//!
//! An array of active scan codes, zero bytes being empty slots.
//!
//! ```text
//! len  scan codes
//!  8   [1..8]
//!  9   [2..9]
//! 12   [2..12]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report classification supplied by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportClass {
    /// Pointer movement report
    Mouse,
    /// Keypad key-array report
    Keyboard,
    /// Anything else (vendor reports, consumer control, ...)
    Other,
}

impl fmt::Display for ReportClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportClass::Mouse => write!(f, "mouse"),
            ReportClass::Keyboard => write!(f, "keyboard"),
            ReportClass::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ReportClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mouse" => Ok(ReportClass::Mouse),
            "keyboard" | "keys" => Ok(ReportClass::Keyboard),
            "other" => Ok(ReportClass::Other),
            _ => Err(format!("Unknown report class: {}", s)),
        }
    }
}

/// Byte offsets of the mouse report fields for one report length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseLayout {
    /// Total report length
    pub length: usize,
    /// Button bitmask byte
    pub buttons: usize,
    /// First byte of the little-endian X delta
    pub x: usize,
    /// First byte of the little-endian Y delta
    pub y: usize,
    /// Signed wheel byte
    pub wheel: usize,
}

/// Known mouse report layouts
pub const MOUSE_LAYOUTS: [MouseLayout; 2] = [
    MouseLayout {
        length: 9,
        buttons: 1,
        x: 3,
        y: 5,
        wheel: 7,
    },
    MouseLayout {
        length: 13,
        buttons: 0,
        x: 2,
        y: 4,
        wheel: 6,
    },
];

/// Layout for a mouse report of the given length
pub fn mouse_layout(length: usize) -> Option<&'static MouseLayout> {
    MOUSE_LAYOUTS.iter().find(|layout| layout.length == length)
}

/// Where the scan code array starts for one keyboard report length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardLayout {
    /// Total report length
    pub length: usize,
    /// Index of the first scan code slot
    pub first_code: usize,
}

/// Known keyboard report layouts
pub const KEYBOARD_LAYOUTS: [KeyboardLayout; 3] = [
    KeyboardLayout {
        length: 8,
        first_code: 1,
    },
    KeyboardLayout {
        length: 9,
        first_code: 2,
    },
    KeyboardLayout {
        length: 12,
        first_code: 2,
    },
];

/// Layout for a keyboard report of the given length
pub fn keyboard_layout(length: usize) -> Option<&'static KeyboardLayout> {
    KEYBOARD_LAYOUTS.iter().find(|layout| layout.length == length)
}

/// Space-separated hex rendering of a report, for trace logs
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
