//! Inverse-time curve evaluation.
//!
//! For a current multiple `M` (measured current / pickup current):
//!
//! - `M < 1`  reset:  `t = TDS * c / (1 - M^2)`
//! - `M == 1` pickup: undefined (both denominators are zero)
//! - `M > 1`  trip:   `t = TDS * (a + b / (M^p - 1))`
//!
//! Both denominators are evaluated in a form that stays strictly positive next
//! to pickup: `M^p - 1` as `expm1(p * ln M)` and `1 - M^2` as `(1 - M)(1 + M)`.
//!
//! Every multiple is validated and computed before anything is returned, so an
//! error never comes with a partial result. A time that does not fit in an
//! `f64` (e.g. a huge TDS) is reported as an error rather than as infinity.
//! Single-point evaluation goes through the same function with a one-element
//! slice.

use crate::curves::CurveError;
use crate::domain::{CurveDefinition, OperatingTime};

impl CurveDefinition {
    /// Build a definition, rejecting coefficients the formulas cannot use.
    pub fn new(a: f64, b: f64, c: f64, p: f64) -> Result<Self, CurveError> {
        let def = Self { a, b, c, p };
        def.validate()?;
        Ok(def)
    }

    /// Check `a, b, c >= 0` and `p > 0`, all finite.
    pub fn validate(&self) -> Result<(), CurveError> {
        for (name, value) in [
            ("coefficient a", self.a),
            ("coefficient b", self.b),
            ("coefficient c", self.c),
        ] {
            if !value.is_finite() {
                return Err(CurveError::invalid_domain(name, value, "must be finite"));
            }
            if value < 0.0 {
                return Err(CurveError::invalid_domain(name, value, "must be >= 0"));
            }
        }
        // p == 0 makes every trip denominator zero.
        if !(self.p.is_finite() && self.p > 0.0) {
            return Err(CurveError::invalid_domain(
                "exponent p",
                self.p,
                "must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Time for one already-validated multiple; `None` if it is not finite.
    fn time_at(&self, tds: f64, multiple: f64) -> Option<OperatingTime> {
        let t = if multiple < 1.0 {
            tds * self.c / ((1.0 - multiple) * (1.0 + multiple))
        } else if multiple == 1.0 {
            return Some(OperatingTime::Undefined);
        } else {
            tds * (self.a + self.b / (self.p * multiple.ln()).exp_m1())
        };
        t.is_finite().then_some(OperatingTime::Time(t))
    }
}

/// Evaluate operating times for a sequence of current multiples.
///
/// Returns one [`OperatingTime`] per input multiple, in input order.
///
/// # Errors
/// [`CurveError::InvalidDomain`] if `tds <= 0`, any multiple is negative, or the
/// curve carries a negative coefficient. Non-finite inputs are rejected too, as
/// is any multiple whose operating time overflows.
pub fn evaluate(
    tds: f64,
    multiples: &[f64],
    curve: &CurveDefinition,
) -> Result<Vec<OperatingTime>, CurveError> {
    if !tds.is_finite() {
        return Err(CurveError::invalid_domain("tds", tds, "must be finite"));
    }
    if tds <= 0.0 {
        return Err(CurveError::invalid_domain("tds", tds, "must be > 0"));
    }
    curve.validate()?;
    for (i, &m) in multiples.iter().enumerate() {
        // NaN fails `m >= 0.0` as well.
        if !(m >= 0.0) {
            return Err(CurveError::invalid_domain(
                format!("multiple[{i}]"),
                m,
                "must be >= 0",
            ));
        }
    }

    multiples
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            curve.time_at(tds, m).ok_or_else(|| {
                CurveError::invalid_domain(
                    format!("multiple[{i}]"),
                    m,
                    "operating time is not a finite f64",
                )
            })
        })
        .collect()
}

/// Evaluate a single multiple (used to highlight one operating condition).
pub fn evaluate_point(
    tds: f64,
    multiple: f64,
    curve: &CurveDefinition,
) -> Result<OperatingTime, CurveError> {
    let times = evaluate(tds, std::slice::from_ref(&multiple), curve)?;
    Ok(times[0])
}
