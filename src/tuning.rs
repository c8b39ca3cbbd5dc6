//! Data-driven game balance
//!
//! Tuning files are JSON documents with any subset of the difficulty fields;
//! missing fields fall back to the built-in constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::DifficultyParams;

/// Why a tuning document was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tuning IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{low} ({low_value}) must not exceed {high} ({high_value})")]
    OutOfOrder {
        low: &'static str,
        low_value: f32,
        high: &'static str,
        high_value: f32,
    },

    #[error("max_hits must be at least 1")]
    NoHitsRequired,
}

/// Serialized form of `DifficultyParams`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: TuningOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningOverrides {
    pub min_speed: Option<f32>,
    pub max_speed: Option<f32>,
    pub min_min_offset: Option<f32>,
    pub max_min_offset: Option<f32>,
    pub min_max_offset: Option<f32>,
    pub max_max_offset: Option<f32>,
    pub hit_threshold: Option<f32>,
    pub max_hits: Option<u32>,
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Apply overrides on top of the defaults and validate the result
    pub fn params(&self) -> Result<DifficultyParams, TuningError> {
        let base = DifficultyParams::default();
        let o = &self.difficulty;
        let params = DifficultyParams {
            min_speed: o.min_speed.unwrap_or(base.min_speed),
            max_speed: o.max_speed.unwrap_or(base.max_speed),
            min_min_offset: o.min_min_offset.unwrap_or(base.min_min_offset),
            max_min_offset: o.max_min_offset.unwrap_or(base.max_min_offset),
            min_max_offset: o.min_max_offset.unwrap_or(base.min_max_offset),
            max_max_offset: o.max_max_offset.unwrap_or(base.max_max_offset),
            hit_threshold: o.hit_threshold.unwrap_or(base.hit_threshold),
            max_hits: o.max_hits.unwrap_or(base.max_hits),
        };
        validate(&params)?;
        Ok(params)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn ordered(low: (&'static str, f32), high: (&'static str, f32)) -> Result<(), TuningError> {
    if low.1 <= high.1 {
        Ok(())
    } else {
        Err(TuningError::OutOfOrder {
            low: low.0,
            low_value: low.1,
            high: high.0,
            high_value: high.1,
        })
    }
}

/// Reject parameters that would break the state machine's invariants
pub fn validate(p: &DifficultyParams) -> Result<(), TuningError> {
    positive("min_speed", p.min_speed)?;
    positive("max_speed", p.max_speed)?;
    positive("hit_threshold", p.hit_threshold)?;
    positive("min_min_offset", p.min_min_offset)?;
    positive("min_max_offset", p.min_max_offset)?;
    positive("max_min_offset", p.max_min_offset)?;
    positive("max_max_offset", p.max_max_offset)?;
    if p.max_hits == 0 {
        return Err(TuningError::NoHitsRequired);
    }
    // Offset window must stay non-empty at both ends of the curve
    ordered(("max_min_offset", p.max_min_offset), ("max_max_offset", p.max_max_offset))?;
    ordered(("min_min_offset", p.min_min_offset), ("min_max_offset", p.min_max_offset))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_defaults() {
        let tuning = Tuning::from_json("{}").unwrap();
        assert_eq!(tuning.params().unwrap(), DifficultyParams::default());
    }

    #[test]
    fn test_partial_override() {
        let tuning =
            Tuning::from_json(r#"{ "difficulty": { "max_hits": 10, "max_speed": 6.0 } }"#).unwrap();
        let params = tuning.params().unwrap();
        assert_eq!(params.max_hits, 10);
        assert_eq!(params.max_speed, 6.0);
        assert_eq!(params.min_speed, DifficultyParams::default().min_speed);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Tuning::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
        assert!(err.to_string().starts_with("Tuning IO error"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, r#"{ "difficulty": { "max_hits": 5 } }"#).unwrap();

        let params = Tuning::load(&path).unwrap().params().unwrap();
        assert_eq!(params.max_hits, 5);
        assert_eq!(params.hit_threshold, DifficultyParams::default().hit_threshold);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ difficulty: "),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_hits() {
        let tuning = Tuning::from_json(r#"{ "difficulty": { "max_hits": 0 } }"#).unwrap();
        assert!(matches!(tuning.params(), Err(TuningError::NoHitsRequired)));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let tuning = Tuning::from_json(r#"{ "difficulty": { "hit_threshold": -0.1 } }"#).unwrap();
        let err = tuning.params().unwrap_err();
        assert!(matches!(err, TuningError::NotPositive { field: "hit_threshold", .. }));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let tuning = Tuning::from_json(r#"{ "difficulty": { "min_max_offset": 0.1 } }"#).unwrap();
        let err = tuning.params().unwrap_err();
        assert!(err.to_string().contains("min_min_offset"));
    }
}
