//! Keypad Report Tracking
//!
//! The keypad does not send press/release events. Each report lists the
//! scan codes that are down right now, so transitions are recovered by
//! diffing the new set against the previous one.
//!
//! # Bitset layout
//!
//! ```text
//! word:   [0]          [1]         [2]         [3]
//! codes:  96..=127     64..=95     32..=63     0..=31
//! ```
//!
//! Bit `b` of word `KEY_STATE_WORDS - 1 - code / 32` stands for scan code
//! `code`, with `b = code % 32`.

use tracing::{debug, trace};

use crate::input::error::{ReportError, Result};
use crate::input::keymap::{self, KeyCode};
use crate::input::report::{keyboard_layout, HexDump};
use crate::input::wheel::ScrollDirection;

/// Number of 32-bit words in a [`KeyBitset`]
pub const KEY_STATE_WORDS: usize = 4;

/// Bits per word
pub const KEY_STATE_BITS: usize = 32;

/// Highest representable scan code plus one
pub const KEY_STATE_CAPACITY: usize = KEY_STATE_WORDS * KEY_STATE_BITS;

/// Set of active scan codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyBitset {
    words: [u32; KEY_STATE_WORDS],
}

impl KeyBitset {
    /// Empty set
    pub const fn new() -> Self {
        Self {
            words: [0; KEY_STATE_WORDS],
        }
    }

    fn position(code: usize) -> Option<(usize, u32)> {
        if code >= KEY_STATE_CAPACITY {
            return None;
        }
        let word = KEY_STATE_WORDS - code / KEY_STATE_BITS - 1;
        Some((word, 1 << (code % KEY_STATE_BITS)))
    }

    /// Build a set from a scan code array, skipping empty (zero) slots
    ///
    /// Codes that do not fit the set are skipped as well.
    pub fn from_codes(codes: &[u8]) -> Self {
        let mut set = Self::new();
        for &code in codes.iter().filter(|&&code| code != 0) {
            if !set.insert(code as usize) {
                debug!("Scan code 0x{:02X} outside key state range, ignoring", code);
            }
        }
        set
    }

    /// Add a scan code, returning false if it cannot be represented
    pub fn insert(&mut self, code: usize) -> bool {
        match Self::position(code) {
            Some((word, mask)) => {
                self.words[word] |= mask;
                true
            }
            None => false,
        }
    }

    /// Check whether a scan code is in the set
    pub fn contains(&self, code: usize) -> bool {
        Self::position(code).is_some_and(|(word, mask)| self.words[word] & mask != 0)
    }

    /// Check whether no scan code is active
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Number of active scan codes
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Raw words, most significant group first
    pub fn words(&self) -> [u32; KEY_STATE_WORDS] {
        self.words
    }

    /// Active scan codes in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.changed(&EMPTY)
    }

    /// Transitions from `self` to `next`, ascending by scan code
    pub fn transitions<'a>(
        &'a self,
        next: &'a KeyBitset,
    ) -> impl Iterator<Item = KeyTransition> + 'a {
        self.changed(next).map(move |code| KeyTransition {
            scan_code: code as u8,
            pressed: next.contains(code),
        })
    }

    /// Scan codes whose bit differs between `self` and `other`
    fn changed<'a>(&'a self, other: &'a KeyBitset) -> impl Iterator<Item = usize> + 'a {
        (0..KEY_STATE_WORDS).flat_map(move |group| {
            let word = KEY_STATE_WORDS - group - 1;
            SetBits(self.words[word] ^ other.words[word])
                .map(move |bit| group * KEY_STATE_BITS + bit)
        })
    }
}

const EMPTY: KeyBitset = KeyBitset::new();

/// Iterator over set bit positions, lowest first
struct SetBits(u32);

impl Iterator for SetBits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}

/// What a key transition means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Deliver as an ordinary key event
    Forward {
        /// Mapped keycode
        code: KeyCode,
        /// Key pressed (true) or released (false)
        pressed: bool,
    },
    /// Start the wheel emulator in this direction
    Arm(ScrollDirection),
    /// Stop the wheel emulator if it runs in this direction
    Disarm(ScrollDirection),
}

/// A single scan code changing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    /// Device scan code
    pub scan_code: u8,
    /// Key pressed (true) or released (false)
    pub pressed: bool,
}

impl KeyTransition {
    /// Mapped keycode, if the scan code has one
    pub fn keycode(&self) -> Option<KeyCode> {
        keymap::lookup(self.scan_code as usize)
    }

    /// Classify this transition; `None` for unmapped scan codes
    pub fn action(&self) -> Option<KeyAction> {
        let code = self.keycode()?;
        Some(match (ScrollDirection::from_key_code(code), self.pressed) {
            (Some(direction), true) => KeyAction::Arm(direction),
            (Some(direction), false) => KeyAction::Disarm(direction),
            (None, pressed) => KeyAction::Forward { code, pressed },
        })
    }
}

/// Keypad state tracker
#[derive(Debug, Default)]
pub struct KeyStateTracker {
    /// Scan codes active in the last accepted report
    state: KeyBitset,
}

impl KeyStateTracker {
    /// Create a tracker with no keys down
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan codes currently considered down
    pub fn state(&self) -> KeyBitset {
        self.state
    }

    /// Process a keypad report and return the transitions it implies
    ///
    /// The stored state is replaced by the report's key set. Reports with an
    /// unknown length are rejected and leave the state untouched.
    pub fn process(&mut self, report: &[u8]) -> Result<Vec<KeyTransition>> {
        trace!("Keyboard report [{}]: {}", report.len(), HexDump(report));

        let layout = keyboard_layout(report.len())
            .ok_or(ReportError::UnrecognizedKeyboardLength(report.len()))?;

        let next = KeyBitset::from_codes(&report[layout.first_code..]);

        trace!(
            "Key state {:08X?} -> {:08X?}",
            self.state.words(),
            next.words()
        );

        let transitions: Vec<KeyTransition> = self.state.transitions(&next).collect();
        self.state = next;

        Ok(transitions)
    }

    /// Forget all held keys without reporting releases
    pub fn clear(&mut self) {
        self.state = KeyBitset::new();
    }
}
