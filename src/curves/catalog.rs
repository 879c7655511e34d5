//! Curve catalog: name -> coefficients.
//!
//! The standard catalog holds the ten published US (IEEE C37.112) and IEC
//! (IEC 60255-151) families. It is built once per process and never mutated;
//! user-defined curves produce a new, extended catalog instead.
//!
//! Lookups accept any of:
//! - the display name (`US Very Inverse`, case-insensitive)
//! - the key (`us-very-inverse`)
//! - the relay code (`U3`)

use std::sync::LazyLock;

use crate::curves::CurveError;
use crate::domain::{CurveDefinition, CurveStandard, NamedCurve, slug};

/// `(name, code, standard, a, b, c, p)` for the published families, in display order.
const STANDARD_CURVES: [(&str, &str, CurveStandard, f64, f64, f64, f64); 10] = [
    ("US Moderately Inverse", "U1", CurveStandard::Us, 0.2256, 0.0104, 1.08, 0.02),
    ("US Standard Inverse", "U2", CurveStandard::Us, 0.18, 5.95, 5.95, 2.0),
    ("US Very Inverse", "U3", CurveStandard::Us, 0.0963, 3.88, 3.88, 2.0),
    ("US Extremely Inverse", "U4", CurveStandard::Us, 0.0352, 5.67, 5.67, 2.0),
    ("US Short-Time Inverse", "U5", CurveStandard::Us, 0.00262, 0.00342, 0.323, 0.02),
    ("IEC Standard Inverse", "C1", CurveStandard::Iec, 0.0, 0.14, 13.5, 0.02),
    ("IEC Very Inverse", "C2", CurveStandard::Iec, 0.0, 13.5, 47.3, 2.0),
    ("IEC Extremely Inverse", "C3", CurveStandard::Iec, 0.0, 80.0, 80.0, 2.0),
    ("IEC Long-Time Inverse", "C4", CurveStandard::Iec, 0.0, 120.0, 120.0, 2.0),
    ("IEC Short-Time Inverse", "C5", CurveStandard::Iec, 0.0, 0.05, 4.85, 0.04),
];

static STANDARD: LazyLock<CurveCatalog> = LazyLock::new(|| CurveCatalog {
    entries: STANDARD_CURVES
        .iter()
        .map(|&(name, code, standard, a, b, c, p)| NamedCurve {
            name: name.to_string(),
            code: Some(code.to_string()),
            standard,
            definition: CurveDefinition { a, b, c, p },
        })
        .collect(),
});

/// An immutable, ordered set of named curves with unique keys and codes.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveCatalog {
    entries: Vec<NamedCurve>,
}

impl CurveCatalog {
    /// The process-wide catalog of published curve families.
    pub fn standard() -> &'static CurveCatalog {
        &STANDARD
    }

    /// Build a catalog from arbitrary entries, validating coefficients and
    /// rejecting duplicate keys/codes.
    pub fn from_entries(entries: Vec<NamedCurve>) -> Result<Self, CurveError> {
        let mut catalog = Self {
            entries: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            catalog.push_checked(entry)?;
        }
        Ok(catalog)
    }

    /// A new catalog holding `self`'s entries followed by `extra`.
    pub fn extended(&self, extra: Vec<NamedCurve>) -> Result<Self, CurveError> {
        let mut catalog = self.clone();
        for entry in extra {
            catalog.push_checked(entry)?;
        }
        Ok(catalog)
    }

    fn push_checked(&mut self, entry: NamedCurve) -> Result<(), CurveError> {
        entry.definition.validate()?;
        let key = entry.key();
        if key.is_empty() {
            return Err(CurveError::invalid_domain(
                format!("curve name '{}'", entry.name),
                f64::NAN,
                "must contain letters or digits",
            ));
        }
        if self.get(&key).is_some() {
            return Err(CurveError::DuplicateCurve(entry.name));
        }
        if let Some(code) = &entry.code {
            if self.get(code).is_some() {
                return Err(CurveError::DuplicateCurve(code.clone()));
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[NamedCurve] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by display name, key, or code.
    pub fn get(&self, name: &str) -> Option<&NamedCurve> {
        let key = slug(name);
        if key.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| {
            e.key() == key
                || e.code
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(name.trim()))
        })
    }

    /// Like [`CurveCatalog::get`], but reports the known names on failure.
    pub fn resolve(&self, name: &str) -> Result<&NamedCurve, CurveError> {
        self.get(name).ok_or_else(|| CurveError::UnknownCurve {
            name: name.to_string(),
            known: self
                .entries
                .iter()
                .map(|e| match &e.code {
                    Some(code) => format!("{code} ({})", e.key()),
                    None => e.key(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Position of an entry (used by the TUI to cycle through curves).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let found = self.get(name)?;
        self.entries.iter().position(|e| e.name == found.name)
    }
}
