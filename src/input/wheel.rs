//! Keypad Wheel Emulation
//!
//! Four keypad keys act as a scroll wheel. Holding one emits a wheel event
//! right away and then once per repeat period until the key is released.
//! The keys have no pressure signal, so the per-tick magnitude is derived
//! from hold time: it grows linearly from the minimum to the maximum
//! resolution over the ramp window and stays at the maximum afterwards.
//!
//! # States
//!
//! ```text
//!            arm(dir)                     disarm(dir) / stop()
//!   Idle ─────────────────> Repeating ─────────────────────────> Idle
//!                            │    ▲
//!                            └────┘ tick every period,
//!                                   arm(other) restarts the ramp
//! ```
//!
//! Every arm and disarm bumps a generation counter. The tick task checks it
//! under the state lock before emitting, so a task woken after a disarm (or
//! after being replaced by a newer arm) exits without output.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::input::clock::Clock;
use crate::input::keymap::{keycodes, KeyCode};
use crate::input::sink::{EventSink, InputEvent, WheelAxis};

/// Tick period while a direction key is held
pub const REPEAT_PERIOD_MS: u64 = 16;

/// Time to reach full speed
pub const RAMP_NS: u64 = 3_000_000_000;

/// Per-tick magnitude when the key was just pressed
pub const MIN_RESOLUTION: i32 = 10;

/// Per-tick magnitude once the ramp is complete
pub const MAX_RESOLUTION: i32 = 100;

/// Fixed-point scale of the ramp interpolation factor
const RAMP_ONE: u64 = 1 << 16;

/// Keypad scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// Keypad 8, vertical wheel positive
    Up,
    /// Keypad 2, vertical wheel negative
    Down,
    /// Keypad 4, horizontal wheel positive
    Left,
    /// Keypad 6, horizontal wheel negative
    Right,
}

impl ScrollDirection {
    /// Direction bound to a keycode, if any
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            keycodes::KEY_KP8 => Some(ScrollDirection::Up),
            keycodes::KEY_KP2 => Some(ScrollDirection::Down),
            keycodes::KEY_KP4 => Some(ScrollDirection::Left),
            keycodes::KEY_KP6 => Some(ScrollDirection::Right),
            _ => None,
        }
    }

    /// Wheel axis this direction scrolls
    pub fn axis(&self) -> WheelAxis {
        match self {
            ScrollDirection::Up | ScrollDirection::Down => WheelAxis::Vertical,
            ScrollDirection::Left | ScrollDirection::Right => WheelAxis::Horizontal,
        }
    }

    /// Sign applied to the tick magnitude
    pub fn sign(&self) -> i32 {
        match self {
            ScrollDirection::Up | ScrollDirection::Left => 1,
            ScrollDirection::Down | ScrollDirection::Right => -1,
        }
    }
}

/// Hold-time to tick-magnitude ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelRamp {
    /// Magnitude at zero hold time
    pub min_resolution: i32,
    /// Magnitude at or beyond the ramp window
    pub max_resolution: i32,
    /// Ramp window in nanoseconds (must be non-zero)
    pub ramp_ns: u64,
}

impl WheelRamp {
    /// Tick magnitude after holding for `elapsed_ns`
    pub fn magnitude(&self, elapsed_ns: u64) -> i32 {
        let ramp_ns = self.ramp_ns.max(1);
        let elapsed = elapsed_ns.min(ramp_ns);
        let factor = (u128::from(elapsed) * u128::from(RAMP_ONE) / u128::from(ramp_ns)) as i64;
        let one = RAMP_ONE as i64;

        let scaled = i64::from(self.min_resolution) * (one - factor)
            + i64::from(self.max_resolution) * factor;
        (scaled >> 16) as i32
    }
}

impl Default for WheelRamp {
    fn default() -> Self {
        Self {
            min_resolution: MIN_RESOLUTION,
            max_resolution: MAX_RESOLUTION,
            ramp_ns: RAMP_NS,
        }
    }
}

/// The held direction key and when it went down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveRepeat {
    direction: ScrollDirection,
    start_ns: u64,
}

#[derive(Debug, Default)]
struct RepeatState {
    /// Set while Repeating
    active: Option<ActiveRepeat>,
    /// Bumped on every arm and disarm
    generation: u64,
    /// Wakes the tick task of the current generation
    cancel: Option<CancellationToken>,
}

impl RepeatState {
    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

struct Shared {
    state: Mutex<RepeatState>,
    ramp: WheelRamp,
    period: Duration,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    ticks: AtomicU64,
}

impl Shared {
    /// Emit one wheel event for the active direction
    fn tick_locked(&self, state: &RepeatState) -> bool {
        let Some(active) = state.active else {
            return false;
        };

        let elapsed = self.clock.now_ns().saturating_sub(active.start_ns);
        let value = active.direction.sign() * self.ramp.magnitude(elapsed);

        trace!(
            "Wheel tick: {:?} elapsed={}ns value={}",
            active.direction,
            elapsed,
            value
        );

        self.sink.emit(vec![InputEvent::Wheel {
            axis: active.direction.axis(),
            value,
        }]);
        self.ticks.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Tick on behalf of `generation`; false once it is stale
    fn tick_generation(&self, generation: u64) -> bool {
        let state = self.state.lock();
        if state.generation != generation {
            trace!(
                "Dropping stale wheel tick (generation {} != {})",
                generation,
                state.generation
            );
            return false;
        }
        self.tick_locked(&state)
    }

    async fn run(self: Arc<Self>, generation: u64, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.period) => {}
            }

            if !self.tick_generation(generation) {
                break;
            }
        }
        trace!("Wheel tick task for generation {} finished", generation);
    }
}

/// Keypad wheel emulator
///
/// Arm and disarm may be called from the report path while the tick task
/// runs on the tokio runtime; both go through one lock.
pub struct WheelEmulator {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl WheelEmulator {
    /// Create an idle emulator
    ///
    /// Tick tasks are spawned on `runtime`.
    pub fn new(
        ramp: WheelRamp,
        period: Duration,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn EventSink>,
        runtime: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(RepeatState::default()),
                ramp,
                period,
                clock,
                sink,
                ticks: AtomicU64::new(0),
            }),
            runtime,
        }
    }

    /// Start repeating in `direction`
    ///
    /// Emits the first tick immediately. Arming while another direction is
    /// active replaces it and restarts the ramp.
    pub fn arm(&self, direction: ScrollDirection) {
        let mut state = self.shared.state.lock();

        if let Some(previous) = state.active {
            debug!(
                "Wheel emulator re-armed: {:?} replaces {:?}",
                direction, previous.direction
            );
        } else {
            debug!("Wheel emulator armed: {:?}", direction);
        }

        state.invalidate();
        state.active = Some(ActiveRepeat {
            direction,
            start_ns: self.shared.clock.now_ns(),
        });
        self.shared.tick_locked(&state);

        let generation = state.generation;
        let cancel = CancellationToken::new();
        state.cancel = Some(cancel.clone());
        drop(state);

        let shared = Arc::clone(&self.shared);
        self.runtime.spawn(shared.run(generation, cancel));
    }

    /// Stop repeating if `direction` is the active one
    ///
    /// Returns false (and changes nothing) for any other direction.
    pub fn disarm(&self, direction: ScrollDirection) -> bool {
        let mut state = self.shared.state.lock();

        match state.active {
            Some(active) if active.direction == direction => {
                debug!("Wheel emulator disarmed: {:?}", direction);
                state.active = None;
                state.invalidate();
                true
            }
            _ => {
                trace!("Ignoring release of non-armed direction {:?}", direction);
                false
            }
        }
    }

    /// Stop repeating regardless of direction
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if state.active.take().is_some() {
            debug!("Wheel emulator stopped");
        }
        state.invalidate();
    }

    /// Direction currently repeating
    pub fn active_direction(&self) -> Option<ScrollDirection> {
        self.shared.state.lock().active.map(|active| active.direction)
    }

    /// Check whether a direction key is held
    pub fn is_repeating(&self) -> bool {
        self.shared.state.lock().active.is_some()
    }

    /// Current generation counter
    pub fn generation(&self) -> u64 {
        self.shared.state.lock().generation
    }

    /// Total wheel ticks emitted
    pub fn ticks_emitted(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    /// Ramp in use
    pub fn ramp(&self) -> WheelRamp {
        self.shared.ramp
    }
}

impl Drop for WheelEmulator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WheelEmulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelEmulator")
            .field("ramp", &self.shared.ramp)
            .field("period", &self.shared.period)
            .field("active", &self.active_direction())
            .finish()
    }
}
