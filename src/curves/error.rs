//! Error types for curve evaluation and catalog lookups.

use thiserror::Error;

/// Errors raised by the evaluator and the curve catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// An input lies outside the domain the curve formulas are defined on.
    #[error("Invalid domain: {what} = {value} ({reason})")]
    InvalidDomain {
        /// Which input was rejected (`tds`, `multiple[3]`, `coefficient a`, ...).
        what: String,
        value: f64,
        reason: &'static str,
    },

    /// No catalog entry matches the requested name.
    #[error("Unknown curve '{name}'. Known curves: {known}")]
    UnknownCurve { name: String, known: String },

    /// Two catalog entries resolve to the same key or code.
    #[error("Duplicate curve '{0}' in catalog")]
    DuplicateCurve(String),
}

impl CurveError {
    /// Create an InvalidDomain error.
    pub fn invalid_domain(what: impl Into<String>, value: f64, reason: &'static str) -> Self {
        Self::InvalidDomain {
            what: what.into(),
            value,
            reason,
        }
    }

    pub fn is_invalid_domain(&self) -> bool {
        matches!(self, CurveError::InvalidDomain { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = CurveError::invalid_domain("tds", 0.0, "must be > 0");
        assert_eq!(err.to_string(), "Invalid domain: tds = 0 (must be > 0)");
        assert!(err.is_invalid_domain());

        let err = CurveError::DuplicateCurve("U1".to_string());
        assert!(!err.is_invalid_domain());
        assert_eq!(err.to_string(), "Duplicate curve 'U1' in catalog");
    }
}
