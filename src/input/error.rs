//! Input Error Types
//!
//! [`ReportError`] names the reasons a raw report produced no events. None of
//! them are failures from the transport's point of view: the session reports
//! them as [`DecodeStatus::Dropped`](crate::input::DecodeStatus) and keeps
//! all state intact.

use thiserror::Error;

use crate::input::report::ReportClass;

/// Result type for report decoding
pub type Result<T> = std::result::Result<T, ReportError>;

/// Why a report was dropped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Mouse report whose length matches no known layout
    #[error("Unrecognized mouse report length: {0} bytes")]
    UnrecognizedMouseLength(usize),

    /// Keyboard report whose length matches no known layout
    #[error("Unrecognized keyboard report length: {0} bytes")]
    UnrecognizedKeyboardLength(usize),
}

impl ReportError {
    /// Report class the dropped report was tagged with
    pub fn class(&self) -> ReportClass {
        match self {
            ReportError::UnrecognizedMouseLength(_) => ReportClass::Mouse,
            ReportError::UnrecognizedKeyboardLength(_) => ReportClass::Keyboard,
        }
    }

    /// Length of the offending report
    pub fn length(&self) -> usize {
        match self {
            ReportError::UnrecognizedMouseLength(len)
            | ReportError::UnrecognizedKeyboardLength(len) => *len,
        }
    }
}

/// Session construction errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session created outside a tokio runtime
    #[error("No tokio runtime available for the wheel emulator: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
