//! Mouse Report Decoding
//!
//! Turns a raw mouse report into relative motion, button state and
//! high-resolution wheel events. The decoder is stateless: every report
//! carries the full button state and deltas since the previous one.

use enumflags2::{bitflags, BitFlags};
use tracing::trace;

use crate::input::error::{ReportError, Result};
use crate::input::keymap::{keycodes, KeyCode};
use crate::input::report::{mouse_layout, HexDump};
use crate::input::sink::{EventFrame, InputEvent, WheelAxis};

/// High-resolution units per physical wheel notch
pub const WHEEL_RESOLUTION: i32 = 120;

/// Largest resolution for which any raw wheel byte scales without overflow
pub const MAX_WHEEL_RESOLUTION: i32 = i32::MAX / 128;

/// Mouse buttons, valued by their bit in the report's button byte
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button (bit 0)
    Left = 0b0000_0001,
    /// Right button (bit 1)
    Right = 0b0000_0010,
    /// Middle button (bit 2)
    Middle = 0b0000_0100,
    /// Forward side button (bit 3)
    Forward = 0b0000_1000,
    /// Back side button (bit 4)
    Back = 0b0001_0000,
}

impl MouseButton {
    /// Convert to Linux button code
    pub fn to_linux_button(&self) -> KeyCode {
        match self {
            MouseButton::Left => keycodes::BTN_LEFT,
            MouseButton::Right => keycodes::BTN_RIGHT,
            MouseButton::Middle => keycodes::BTN_MIDDLE,
            MouseButton::Forward => keycodes::BTN_FORWARD,
            MouseButton::Back => keycodes::BTN_BACK,
        }
    }
}

/// Set of buttons held down
pub type ButtonState = BitFlags<MouseButton>;

/// One decoded mouse report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseSample {
    /// X delta
    pub dx: i16,
    /// Y delta
    pub dy: i16,
    /// Buttons held
    pub buttons: ButtonState,
    /// Raw wheel notches
    pub wheel_ticks: i8,
}

impl MouseSample {
    /// Parse a raw mouse report
    ///
    /// Bits 5-7 of the button byte are ignored. Reports whose length has no
    /// known layout are rejected.
    pub fn decode(report: &[u8]) -> Result<Self> {
        let layout = mouse_layout(report.len())
            .ok_or(ReportError::UnrecognizedMouseLength(report.len()))?;

        Ok(Self {
            dx: i16::from_le_bytes([report[layout.x], report[layout.x + 1]]),
            dy: i16::from_le_bytes([report[layout.y], report[layout.y + 1]]),
            buttons: BitFlags::from_bits_truncate(report[layout.buttons]),
            wheel_ticks: report[layout.wheel] as i8,
        })
    }

    /// Wheel delta in high-resolution units
    pub fn wheel_hi_res(&self, resolution: i32) -> i32 {
        i32::from(self.wheel_ticks).saturating_mul(resolution)
    }

    /// Check whether a button is held in this sample
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(button)
    }

    /// Events for this sample: buttons, motion and, when the wheel moved,
    /// a vertical wheel event
    pub fn to_frame(&self, wheel_resolution: i32) -> EventFrame {
        let mut frame = vec![
            InputEvent::Buttons {
                state: self.buttons,
            },
            InputEvent::Motion {
                dx: self.dx,
                dy: self.dy,
            },
        ];

        if self.wheel_ticks != 0 {
            frame.push(InputEvent::Wheel {
                axis: WheelAxis::Vertical,
                value: self.wheel_hi_res(wheel_resolution),
            });
        }

        frame
    }
}

/// Mouse report decoder
#[derive(Debug, Clone)]
pub struct MouseDecoder {
    /// High-resolution units per wheel notch
    wheel_resolution: i32,
}

impl MouseDecoder {
    /// Create a decoder with the given wheel resolution
    pub fn new(wheel_resolution: i32) -> Self {
        Self { wheel_resolution }
    }

    /// Decode a report into the frame to deliver
    pub fn decode(&self, report: &[u8]) -> Result<EventFrame> {
        trace!("Mouse report [{}]: {}", report.len(), HexDump(report));

        let sample = MouseSample::decode(report)?;

        trace!(
            "Mouse sample: dx={}, dy={}, buttons={:?}, wheel={}",
            sample.dx,
            sample.dy,
            sample.buttons,
            sample.wheel_ticks
        );

        Ok(sample.to_frame(self.wheel_resolution))
    }
}

impl Default for MouseDecoder {
    fn default() -> Self {
        Self::new(WHEEL_RESOLUTION)
    }
}
