// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Engine error types

use core::fmt;

/// Error type for crypto engine operations
///
/// Every error is detected and returned synchronously to the immediate
/// caller. `Timeout` is always terminal for the request; the engine
/// instance needs a caller-driven reset afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Algorithm is not present or has been fused off on this instance
    UnsupportedAlgorithm,
    /// Total length is not a multiple of the algorithm's block length
    BlockAlignment,
    /// No key bytes supplied and no device-resident secure key available
    SecureKeyUnavailable,
    /// Output buffer missing or too small
    NullOutput,
    /// Malformed request (key length, scatter totals, chunk plan, reuse
    /// of a consumed or poisoned context)
    InvalidRequest,
    /// Hardware did not signal completion within the retry budget
    Timeout,
}

impl EngineError {
    /// Get error code for logging/debugging
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::UnsupportedAlgorithm => 0x0E01,
            Self::BlockAlignment => 0x0E02,
            Self::SecureKeyUnavailable => 0x0E03,
            Self::NullOutput => 0x0E04,
            Self::InvalidRequest => 0x0E05,
            Self::Timeout => 0x0E06,
        }
    }

    /// Get error description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::UnsupportedAlgorithm => "algorithm unsupported or disabled",
            Self::BlockAlignment => "length not block aligned",
            Self::SecureKeyUnavailable => "secure key unavailable",
            Self::NullOutput => "output buffer missing or too small",
            Self::InvalidRequest => "malformed request",
            Self::Timeout => "hardware completion timeout",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EngineError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}

/// Result type for crypto engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable_and_unique() {
        let all = [
            EngineError::UnsupportedAlgorithm,
            EngineError::BlockAlignment,
            EngineError::SecureKeyUnavailable,
            EngineError::NullOutput,
            EngineError::InvalidRequest,
            EngineError::Timeout,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
        assert_eq!(EngineError::Timeout.code(), 0x0E06);
    }
}
