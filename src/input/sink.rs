//! Output Events and Sinks
//!
//! Decoded reports and emulator ticks leave the core as frames: a frame is
//! the group of events that belong to one sync point (one mouse report, one
//! key transition, one wheel tick). The registration layer that turns them
//! into real input device events implements [`EventSink`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::input::keymap::{keycodes, KeyCode};
use crate::input::mouse::ButtonState;

/// One group of events delivered together
pub type EventFrame = Vec<InputEvent>;

/// Wheel axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelAxis {
    /// Vertical wheel
    Vertical,
    /// Horizontal wheel (tilt)
    Horizontal,
}

impl WheelAxis {
    /// Linux high-resolution relative axis code
    pub fn hi_res_code(&self) -> u16 {
        match self {
            WheelAxis::Vertical => keycodes::REL_WHEEL_HI_RES,
            WheelAxis::Horizontal => keycodes::REL_HWHEEL_HI_RES,
        }
    }
}

/// Normalized input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Relative pointer motion
    Motion {
        /// X delta
        dx: i16,
        /// Y delta
        dy: i16,
    },

    /// Full button state
    Buttons {
        /// Buttons currently held
        state: ButtonState,
    },

    /// High-resolution wheel motion (120 units per notch)
    Wheel {
        /// Wheel axis
        axis: WheelAxis,
        /// Signed delta in high-resolution units
        value: i32,
    },

    /// Key transition
    Key {
        /// Linux evdev keycode
        code: KeyCode,
        /// Key pressed (true) or released (false)
        pressed: bool,
    },
}

/// Receiver of decoded event frames
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    /// Deliver one frame
    fn emit(&self, frame: EventFrame);
}

/// Sink forwarding frames into a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<EventFrame>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, frame: EventFrame) {
        if self.tx.send(frame).is_err() {
            debug!("Event receiver dropped, discarding frame");
        }
    }
}

/// Sink keeping every frame in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<EventFrame>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all frames recorded so far
    pub fn frames(&self) -> Vec<EventFrame> {
        self.frames.lock().clone()
    }

    /// All recorded events, flattened in delivery order
    pub fn events(&self) -> Vec<InputEvent> {
        self.frames.lock().iter().flatten().copied().collect()
    }

    /// Remove and return all recorded frames
    pub fn take(&self) -> Vec<EventFrame> {
        std::mem::take(&mut *self.frames.lock())
    }

    /// Number of frames recorded
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    /// Check whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, frame: EventFrame) {
        self.frames.lock().push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::mouse::MouseButton;

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.emit(vec![InputEvent::Key {
            code: keycodes::KEY_A,
            pressed: true,
        }]);
        sink.emit(vec![
            InputEvent::Motion { dx: 1, dy: 2 },
            InputEvent::Wheel {
                axis: WheelAxis::Vertical,
                value: 120,
            },
        ]);

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events().len(), 3);

        let frames = sink.take();
        assert_eq!(frames.len(), 2);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_channel_sink() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(vec![InputEvent::Motion { dx: -3, dy: 4 }]);

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame, vec![InputEvent::Motion { dx: -3, dy: 4 }]);
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.emit(vec![InputEvent::Motion { dx: 0, dy: 0 }]);
    }

    #[test]
    fn test_wheel_axis_codes() {
        assert_eq!(WheelAxis::Vertical.hi_res_code(), 0x0b);
        assert_eq!(WheelAxis::Horizontal.hi_res_code(), 0x0c);
    }

    #[test]
    fn test_event_json() {
        let event = InputEvent::Key {
            code: keycodes::KEY_A,
            pressed: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"key","code":30,"pressed":true}"#);

        let event = InputEvent::Buttons {
            state: MouseButton::Left | MouseButton::Back,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
