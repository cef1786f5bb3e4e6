//! Report Replay Scripts
//!
//! Captured reports can be fed back through a [`DeviceSession`] from a
//! plain text script, one step per line:
//!
//! ```text
//! # press keypad 8 for a quarter second
//! keyboard 00 00 60 00 00 00 00 00 00
//! wait 250
//! keyboard 00 00 00 00 00 00 00 00 00
//! mouse    00 01 00 0A 00 F6 FF 01 00
//! ```
//!
//! Hex bytes may be separated by whitespace or written as one run
//! (`0001000A00`). Blank lines and `#` comments are skipped.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::input::report::ReportClass;
use crate::input::session::{DecodeStatus, DeviceSession};

/// Replay script errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// First word of the line is not a known directive
    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective {
        /// 1-based line number
        line: usize,
        /// Offending word
        directive: String,
    },

    /// Report payload token is not valid hex
    #[error("line {line}: invalid hex '{token}'")]
    InvalidHex {
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// `wait` without a valid millisecond count
    #[error("line {line}: invalid wait duration '{value}'")]
    InvalidWait {
        /// 1-based line number
        line: usize,
        /// Offending value
        value: String,
    },
}

/// One script step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    /// Decode a raw report
    Report {
        /// Report class tag
        class: ReportClass,
        /// Report payload
        bytes: Vec<u8>,
    },
    /// Let time pass
    Wait(Duration),
}

/// Outcome counts of a replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Report steps executed
    pub reports: usize,
    /// Reports the session dropped
    pub dropped: usize,
    /// Reports the session ignored
    pub ignored: usize,
}

/// Parse a whole script
pub fn parse_script(input: &str) -> Result<Vec<ReplayStep>, ReplayError> {
    let mut steps = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if let Some(step) = parse_line(index + 1, line)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

/// Parse one line; `None` for blank and comment lines
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ReplayStep>, ReplayError> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut words = line.split_whitespace();
    let Some(directive) = words.next() else {
        return Ok(None);
    };

    if directive.eq_ignore_ascii_case("wait") {
        let value: Vec<&str> = words.collect();
        let ms = match value.as_slice() {
            [ms] => ms.parse::<u64>().ok(),
            _ => None,
        };
        return ms
            .map(|ms| Some(ReplayStep::Wait(Duration::from_millis(ms))))
            .ok_or_else(|| ReplayError::InvalidWait {
                line: line_no,
                value: value.join(" "),
            });
    }

    let class = directive
        .parse::<ReportClass>()
        .map_err(|_| ReplayError::UnknownDirective {
            line: line_no,
            directive: directive.to_string(),
        })?;

    let mut bytes = Vec::new();
    for token in words {
        decode_hex(token, &mut bytes).ok_or_else(|| ReplayError::InvalidHex {
            line: line_no,
            token: token.to_string(),
        })?;
    }

    Ok(Some(ReplayStep::Report { class, bytes }))
}

fn decode_hex(token: &str, out: &mut Vec<u8>) -> Option<()> {
    let token = token.strip_prefix("0x").unwrap_or(token);
    if token.is_empty() || token.len() % 2 != 0 {
        return None;
    }
    for pair in token.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(pair).ok()?;
        out.push(u8::from_str_radix(pair, 16).ok()?);
    }
    Some(())
}

/// Run a parsed script against a session
///
/// `wait` steps sleep on the tokio timer, so the wheel emulator keeps
/// ticking while the script pauses.
pub async fn run(session: &mut DeviceSession, steps: &[ReplayStep]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for step in steps {
        match step {
            ReplayStep::Report { class, bytes } => {
                summary.reports += 1;
                match session.decode(*class, bytes) {
                    DecodeStatus::Handled => {}
                    DecodeStatus::Dropped(e) => {
                        info!("Report {} dropped: {}", summary.reports, e);
                        summary.dropped += 1;
                    }
                    DecodeStatus::Ignored => summary.ignored += 1,
                }
            }
            ReplayStep::Wait(duration) => {
                debug!("Waiting {:?}", duration);
                tokio::time::sleep(*duration).await;
            }
        }
    }

    summary
}
