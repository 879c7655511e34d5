//! Read user-defined curves from JSON.
//!
//! Expected shape:
//!
//! ```json
//! [
//!   { "name": "Feeder 7 Custom", "code": "F7", "a": 0.05, "b": 2.5, "c": 3.0, "p": 1.5 }
//! ]
//! ```
//!
//! Coefficients are validated here so a malformed file is reported with the
//! offending curve name before it ever reaches the catalog.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{CurveDefinition, CurveStandard, NamedCurve};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CurveRecord {
    name: String,
    #[serde(default)]
    code: Option<String>,
    a: f64,
    b: f64,
    c: f64,
    p: f64,
}

/// Read a curve catalog file.
pub fn read_catalog_json(path: &Path) -> Result<Vec<NamedCurve>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open curve catalog '{}': {e}", path.display()))
    })?;
    parse_catalog(BufReader::new(file))
        .map_err(|e| AppError::input(format!("{}: {}", path.display(), e.message())))
}

/// Parse catalog records from any reader.
pub fn parse_catalog(reader: impl std::io::Read) -> Result<Vec<NamedCurve>, AppError> {
    let records: Vec<CurveRecord> = serde_json::from_reader(reader)
        .map_err(|e| AppError::input(format!("Invalid curve catalog JSON: {e}")))?;

    records
        .into_iter()
        .map(|r| {
            let definition = CurveDefinition::new(r.a, r.b, r.c, r.p)
                .map_err(|e| AppError::input(format!("Curve '{}': {e}", r.name)))?;
            Ok(NamedCurve {
                name: r.name,
                code: r.code,
                standard: CurveStandard::Custom,
                definition,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_custom_curves() {
        let json = r#"[
            {"name": "Feeder 7", "code": "F7", "a": 0.05, "b": 2.5, "c": 3.0, "p": 1.5},
            {"name": "Motor", "a": 0, "b": 1, "c": 1, "p": 2}
        ]"#;
        let curves = parse_catalog(json.as_bytes()).unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].code.as_deref(), Some("F7"));
        assert_eq!(curves[0].standard, CurveStandard::Custom);
        assert_eq!(curves[1].definition.p, 2.0);
    }

    #[test]
    fn negative_coefficients_name_the_curve() {
        let json = r#"[{"name": "Broken", "a": 0.1, "b": -2, "c": 1, "p": 2}]"#;
        let err = parse_catalog(json.as_bytes()).unwrap_err();
        assert!(err.message().contains("Broken"), "{err}");
        assert!(err.message().contains("coefficient b"), "{err}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"[{"name": "X", "a": 0, "b": 1, "c": 1, "p": 2, "q": 3}]"#;
        assert!(parse_catalog(json.as_bytes()).is_err());
    }
}
