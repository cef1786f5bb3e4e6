//! Input Report Decoding
//!
//! Turns raw report payloads from a Logitech wireless mouse and keypad
//! receiver into normalized input events.
//!
//! # Architecture
//!
//! ```text
//! Tagged raw reports
//!       ↓
//! ┌─────────────────────────┐
//! │  DeviceSession          │ ← Per-device context
//! │  - Report dispatch      │
//! │  - Statistics           │
//! └─────────────────────────┘
//!       ↓              ↓                ↓
//! ┌──────────┐  ┌──────────────┐  ┌───────────────┐
//! │  Mouse   │  │  Key State   │  │ Wheel Repeat  │
//! │ Decoder  │  │  Tracker     │─>│ Emulator      │
//! └──────────┘  └──────────────┘  └───────────────┘
//!       ↓              ↓                ↓
//!             EventSink (frames)
//! ```
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use logi_mouse::config::Config;
//! use logi_mouse::input::{ChannelSink, DeviceSession, ReportClass};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, mut frames) = ChannelSink::new();
//! let mut session = DeviceSession::new(&Config::default_config(), Arc::new(sink))?;
//!
//! // Left button down, moved right and up, one wheel notch
//! let report = [0x00, 0x01, 0x00, 0x0A, 0x00, 0xF6, 0xFF, 0x01, 0x00];
//! session.decode(ReportClass::Mouse, &report);
//!
//! if let Some(frame) = frames.recv().await {
//!     println!("{:?}", frame);
//! }
//!
//! session.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod keyboard;
pub mod keymap;
pub mod mouse;
pub mod report;
pub mod session;
pub mod sink;
pub mod wheel;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{ReportError, Result, SessionError};
pub use keyboard::{KeyAction, KeyBitset, KeyStateTracker, KeyTransition};
pub use keymap::KeyCode;
pub use mouse::{ButtonState, MouseButton, MouseDecoder, MouseSample};
pub use report::{HexDump, ReportClass};
pub use session::{Capabilities, DecodeStatus, DeviceSession, SessionStats};
pub use sink::{ChannelSink, EventFrame, EventSink, InputEvent, RecordingSink, WheelAxis};
pub use wheel::{ScrollDirection, WheelEmulator, WheelRamp};
