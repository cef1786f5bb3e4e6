//! # logi-mouse
//!
//! Report decoder for a Logitech wireless mouse and keypad combo receiver.
//!
//! The crate sits between a HID transport and an input-event sink. The
//! transport hands over raw reports tagged with their class, and the crate
//! emits normalized events:
//! - [`input::mouse`] - relative motion, button state, high-resolution wheel
//! - [`input::keyboard`] - key press/release from key-array reports
//! - [`input::wheel`] - keypad direction keys emulated as a ramping wheel
//!
//! # Architecture
//!
//! ```text
//! logi-mouse
//!   ├─> DeviceSession (dispatch by report class)
//!   │     ├─> MouseDecoder
//!   │     ├─> KeyStateTracker ──> scan code map
//!   │     └─> WheelEmulator (timed ticks on tokio)
//!   └─> EventSink (frames out)
//! ```
//!
//! Device discovery, descriptor parsing and input device registration are
//! left to the embedding transport.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Decoder configuration
pub mod config;

/// Report decoding and event generation
pub mod input;

/// Replay of captured report scripts
pub mod replay;

pub use config::Config;
pub use input::{DecodeStatus, DeviceSession, EventSink, InputEvent, ReportClass};
