//! Device Session and Report Dispatch
//!
//! A [`DeviceSession`] is the per-device context the transport owns. It
//! routes each tagged report to the mouse decoder or the keypad tracker,
//! forwards ordinary key transitions to the sink and turns direction-key
//! transitions into wheel emulator arm/disarm calls.
//!
//! ```text
//! decode(class, bytes)
//!       │
//!       ├─ Mouse ────> MouseDecoder ─────────────> sink (buttons, motion, wheel)
//!       │
//!       ├─ Keyboard ─> KeyStateTracker ─┬─ Forward ─> sink (key)
//!       │                               └─ Arm/Disarm ─> WheelEmulator ─> sink (wheel, timed)
//!       │
//!       └─ Other ────> ignored
//! ```
//!
//! Report decoding is expected to be serialized per device (`&mut self`);
//! the emulator's tick task runs concurrently and synchronizes internally.

use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::config::Config;
use crate::input::clock::{Clock, MonotonicClock};
use crate::input::error::{ReportError, SessionError};
use crate::input::keyboard::{KeyAction, KeyBitset, KeyStateTracker};
use crate::input::keymap::{self, keycodes, KeyCode};
use crate::input::mouse::{MouseButton, MouseDecoder};
use crate::input::report::ReportClass;
use crate::input::sink::{EventSink, InputEvent};
use crate::input::wheel::WheelEmulator;

/// Outcome of one [`DeviceSession::decode`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Report understood; any resulting events were delivered
    Handled,
    /// Report of a known class but unusable; nothing was emitted
    Dropped(ReportError),
    /// Report class this session does not handle
    Ignored,
}

impl DecodeStatus {
    /// Check whether the report was handled
    pub fn is_handled(&self) -> bool {
        matches!(self, DecodeStatus::Handled)
    }
}

/// Per-session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Reports decoded
    pub reports_handled: u64,
    /// Reports dropped for an unknown length
    pub reports_dropped: u64,
    /// Reports of other classes
    pub reports_ignored: u64,
    /// Key events forwarded to the sink
    pub keys_forwarded: u64,
    /// Scan code transitions with no mapping
    pub keys_unmapped: u64,
    /// Synthetic wheel ticks emitted
    pub wheel_ticks: u64,
}

/// Event codes a session can produce
///
/// Intended for the registration layer, which has to declare them before
/// the first event is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Keys forwarded from the keypad
    pub keys: Vec<KeyCode>,
    /// Mouse buttons
    pub buttons: Vec<KeyCode>,
    /// Relative axes
    pub relative_axes: Vec<u16>,
}

impl Capabilities {
    /// Capabilities of the supported device
    pub fn new() -> Self {
        let buttons = [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::Back,
            MouseButton::Forward,
        ]
        .iter()
        .map(MouseButton::to_linux_button)
        .chain([keycodes::BTN_TOOL_DOUBLETAP])
        .collect();

        Self {
            keys: keymap::forwarded_keys()
                .chain(keymap::AUXILIARY_KEYS)
                .collect(),
            buttons,
            relative_axes: vec![
                keycodes::REL_X,
                keycodes::REL_Y,
                keycodes::REL_WHEEL,
                keycodes::REL_WHEEL_HI_RES,
                keycodes::REL_HWHEEL,
                keycodes::REL_HWHEEL_HI_RES,
            ],
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoding context for one physical device
pub struct DeviceSession {
    mouse: MouseDecoder,
    keyboard: KeyStateTracker,
    wheel: WheelEmulator,
    sink: Arc<dyn EventSink>,
    stats: SessionStats,
}

impl DeviceSession {
    /// Create a session on the current tokio runtime
    pub fn new(config: &Config, sink: Arc<dyn EventSink>) -> Result<Self, SessionError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_parts(
            config,
            sink,
            Arc::new(MonotonicClock::new()),
            runtime,
        ))
    }

    /// Create a session with an explicit clock and runtime
    pub fn with_parts(
        config: &Config,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        runtime: Handle,
    ) -> Self {
        debug!(
            "Device session: wheel_resolution={}, repeat={}ms, ramp={}..{} over {}ns",
            config.mouse.wheel_resolution,
            config.wheel.repeat_period_ms,
            config.wheel.min_resolution,
            config.wheel.max_resolution,
            config.wheel.ramp_ns
        );

        Self {
            mouse: MouseDecoder::new(config.mouse.wheel_resolution),
            keyboard: KeyStateTracker::new(),
            wheel: WheelEmulator::new(
                config.wheel.ramp(),
                config.wheel.period(),
                clock,
                Arc::clone(&sink),
                runtime,
            ),
            sink,
            stats: SessionStats::default(),
        }
    }

    /// Decode one raw report
    ///
    /// Never fails: unusable reports are dropped and reported through the
    /// returned status, leaving all state unchanged.
    pub fn decode(&mut self, class: ReportClass, report: &[u8]) -> DecodeStatus {
        let result = match class {
            ReportClass::Mouse => self.handle_mouse(report),
            ReportClass::Keyboard => self.handle_keyboard(report),
            ReportClass::Other => {
                trace!("Ignoring {} byte report of class {}", report.len(), class);
                self.stats.reports_ignored += 1;
                return DecodeStatus::Ignored;
            }
        };

        match result {
            Ok(()) => {
                self.stats.reports_handled += 1;
                DecodeStatus::Handled
            }
            Err(e) => {
                debug!("Dropping {} report: {}", class, e);
                self.stats.reports_dropped += 1;
                DecodeStatus::Dropped(e)
            }
        }
    }

    fn handle_mouse(&mut self, report: &[u8]) -> Result<(), ReportError> {
        let frame = self.mouse.decode(report)?;
        self.sink.emit(frame);
        Ok(())
    }

    fn handle_keyboard(&mut self, report: &[u8]) -> Result<(), ReportError> {
        for transition in self.keyboard.process(report)? {
            match transition.action() {
                Some(KeyAction::Forward { code, pressed }) => {
                    trace!(
                        "Key {}: scan=0x{:02X} code={}",
                        if pressed { "press" } else { "release" },
                        transition.scan_code,
                        code
                    );
                    self.sink.emit(vec![InputEvent::Key { code, pressed }]);
                    self.stats.keys_forwarded += 1;
                }
                Some(KeyAction::Arm(direction)) => self.wheel.arm(direction),
                Some(KeyAction::Disarm(direction)) => {
                    self.wheel.disarm(direction);
                }
                None => {
                    trace!(
                        "Unmapped scan code 0x{:02X} {}",
                        transition.scan_code,
                        if transition.pressed { "pressed" } else { "released" }
                    );
                    self.stats.keys_unmapped += 1;
                }
            }
        }
        Ok(())
    }

    /// Stop the wheel emulator and forget held keys
    ///
    /// Called on device detach; no tick is emitted after this returns.
    pub fn shutdown(&mut self) {
        debug!("Shutting down device session");
        self.wheel.stop();
        self.keyboard.clear();
    }

    /// Session counters
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            wheel_ticks: self.wheel.ticks_emitted(),
            ..self.stats
        }
    }

    /// Scan codes currently held
    pub fn key_state(&self) -> KeyBitset {
        self.keyboard.state()
    }

    /// Wheel emulator of this session
    pub fn wheel(&self) -> &WheelEmulator {
        &self.wheel
    }

    /// Event codes this session can emit
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::new()
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("mouse", &self.mouse)
            .field("keyboard", &self.keyboard)
            .field("wheel", &self.wheel)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::clock::ManualClock;
    use crate::input::sink::{MockEventSink, RecordingSink, WheelAxis};
    use crate::input::wheel::ScrollDirection;

    fn session(sink: Arc<dyn EventSink>) -> DeviceSession {
        DeviceSession::with_parts(
            &Config::default_config(),
            sink,
            Arc::new(ManualClock::new(0)),
            Handle::current(),
        )
    }

    fn keys(codes: &[u8]) -> Vec<u8> {
        let mut report = vec![0u8; 8];
        report[1..1 + codes.len()].copy_from_slice(codes);
        report
    }

    #[tokio::test]
    async fn test_mouse_report_dispatch() {
        let mut sink = MockEventSink::new();
        sink.expect_emit()
            .withf(|frame| {
                frame
                    == &vec![
                        InputEvent::Buttons {
                            state: MouseButton::Left.into(),
                        },
                        InputEvent::Motion { dx: 10, dy: -10 },
                        InputEvent::Wheel {
                            axis: WheelAxis::Vertical,
                            value: 120,
                        },
                    ]
            })
            .times(1)
            .return_const(());

        let mut session = session(Arc::new(sink));
        let status = session.decode(
            ReportClass::Mouse,
            &[0x00, 0x01, 0x00, 0x0A, 0x00, 0xF6, 0xFF, 0x01, 0x00],
        );
        assert_eq!(status, DecodeStatus::Handled);
    }

    #[tokio::test]
    async fn test_other_class_ignored() {
        let mut sink = MockEventSink::new();
        sink.expect_emit().never();

        let mut session = session(Arc::new(sink));
        assert_eq!(
            session.decode(ReportClass::Other, &[0u8; 9]),
            DecodeStatus::Ignored
        );
        assert_eq!(session.stats().reports_ignored, 1);
    }

    #[tokio::test]
    async fn test_bad_lengths_dropped() {
        let mut sink = MockEventSink::new();
        sink.expect_emit().never();

        let mut session = session(Arc::new(sink));
        assert_eq!(
            session.decode(ReportClass::Mouse, &[0u8; 5]),
            DecodeStatus::Dropped(ReportError::UnrecognizedMouseLength(5))
        );
        assert_eq!(
            session.decode(ReportClass::Keyboard, &[0x04; 10]),
            DecodeStatus::Dropped(ReportError::UnrecognizedKeyboardLength(10))
        );
        assert_eq!(session.key_state(), KeyBitset::new());
        assert_eq!(session.stats().reports_dropped, 2);
    }

    #[tokio::test]
    async fn test_key_press_release() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session(sink.clone());

        assert!(session.decode(ReportClass::Keyboard, &keys(&[0x04])).is_handled());
        assert!(session.decode(ReportClass::Keyboard, &keys(&[])).is_handled());

        assert_eq!(
            sink.frames(),
            vec![
                vec![InputEvent::Key {
                    code: keycodes::KEY_A,
                    pressed: true
                }],
                vec![InputEvent::Key {
                    code: keycodes::KEY_A,
                    pressed: false
                }],
            ]
        );
        assert_eq!(session.stats().keys_forwarded, 2);
    }

    #[tokio::test]
    async fn test_direction_keys_not_forwarded() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session(sink.clone());

        session.decode(ReportClass::Keyboard, &keys(&[0x60]));
        assert_eq!(session.wheel().active_direction(), Some(ScrollDirection::Up));

        session.decode(ReportClass::Keyboard, &keys(&[]));
        assert!(!session.wheel().is_repeating());

        assert!(sink
            .events()
            .iter()
            .all(|event| matches!(event, InputEvent::Wheel { .. })));
        assert_eq!(session.stats().keys_forwarded, 0);
        assert_eq!(session.stats().wheel_ticks, 1);
    }

    #[tokio::test]
    async fn test_unmapped_codes_counted() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session(sink.clone());

        session.decode(ReportClass::Keyboard, &keys(&[0x03, 0x7F]));
        session.decode(ReportClass::Keyboard, &keys(&[]));

        assert!(sink.is_empty());
        assert_eq!(session.stats().keys_unmapped, 4);
    }

    #[tokio::test]
    async fn test_shutdown() {
        let sink = Arc::new(RecordingSink::new());
        let mut session = session(sink.clone());

        session.decode(ReportClass::Keyboard, &keys(&[0x04, 0x5C]));
        assert!(session.wheel().is_repeating());

        session.shutdown();
        assert!(!session.wheel().is_repeating());
        assert!(session.key_state().is_empty());
    }

    #[test]
    fn test_capabilities() {
        let caps = Capabilities::new();
        assert!(caps.keys.contains(&keycodes::KEY_A));
        assert!(!caps.keys.contains(&keycodes::KEY_KP8));
        assert_eq!(caps.buttons.len(), 6);
        assert!(caps.buttons.contains(&keycodes::BTN_TOOL_DOUBLETAP));
        assert!(caps.keys.contains(&keycodes::KEY_BACK));
        assert!(caps.keys.contains(&keycodes::KEY_FORWARD));
        assert_eq!(caps.keys.len(), 91);
        assert!(caps.relative_axes.contains(&keycodes::REL_HWHEEL_HI_RES));
    }

    #[test]
    fn test_new_requires_runtime() {
        let result = DeviceSession::new(
            &Config::default_config(),
            Arc::new(RecordingSink::new()),
        );
        assert!(matches!(result, Err(SessionError::NoRuntime(_))));
    }
}
