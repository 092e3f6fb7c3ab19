//! The bounded trait vector and its compatibility distance.
//!
//! Four lifestyle dimensions, each an integer in [1,7]:
//! chronotype (morning↔night), noise sensitivity (low↔high),
//! sociability (introvert↔extrovert), study focus (light↔deep).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Lower inclusive bound of every trait dimension.
pub const TRAIT_MIN: u8 = 1;
/// Upper inclusive bound of every trait dimension.
pub const TRAIT_MAX: u8 = 7;
/// Maximum possible distance between two vectors (4 dimensions × 6).
pub const MAX_DISTANCE: u32 = 24;

/// A student's lifestyle profile as four bounded integers.
///
/// Immutable once computed; owned exclusively by one student. Construct via
/// [`TraitVector::new`], which enforces the [1,7] bound — out-of-range values
/// are a trait-source bug, not recoverable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TraitVector {
    pub chronotype: u8,
    pub noise_sensitivity: u8,
    pub sociability: u8,
    pub study_focus: u8,
}

impl TraitVector {
    /// Build a trait vector, validating every dimension against [1,7].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvariantViolation` naming the first offending
    /// dimension. Values are never clamped — clamping would mask deriver bugs.
    pub fn new(
        chronotype: u8,
        noise_sensitivity: u8,
        sociability: u8,
        study_focus: u8,
    ) -> Result<Self, CoreError> {
        for (dimension, value) in [
            ("chronotype", chronotype),
            ("noise_sensitivity", noise_sensitivity),
            ("sociability", sociability),
            ("study_focus", study_focus),
        ] {
            if !(TRAIT_MIN..=TRAIT_MAX).contains(&value) {
                return Err(CoreError::InvariantViolation {
                    dimension,
                    value: i64::from(value),
                });
            }
        }
        Ok(Self {
            chronotype,
            noise_sensitivity,
            sociability,
            study_focus,
        })
    }

    /// Compatibility distance: sum of absolute per-dimension differences.
    ///
    /// Range [0, 24]; 0 = identical profiles; lower = more compatible.
    /// Symmetric: `a.distance(&b) == b.distance(&a)`.
    #[must_use]
    pub const fn distance(&self, other: &Self) -> u32 {
        self.chronotype.abs_diff(other.chronotype) as u32
            + self.noise_sensitivity.abs_diff(other.noise_sensitivity) as u32
            + self.sociability.abs_diff(other.sociability) as u32
            + self.study_focus.abs_diff(other.study_focus) as u32
    }

    /// Dimensions in canonical order, for iteration.
    #[must_use]
    pub const fn dimensions(&self) -> [u8; 4] {
        [
            self.chronotype,
            self.noise_sensitivity,
            self.sociability,
            self.study_focus,
        ]
    }
}

/// Normalize a raw distance to a percentage for operator reporting.
///
/// `round((1 - score/24) * 100)`: 0 distance → 100%, 24 → 0%. Scores past
/// the theoretical maximum (bad data) floor at 0%. The raw distance, not
/// this percentage, is what gets persisted.
#[must_use]
pub fn compatibility_percent(score: u32) -> u8 {
    let clamped = score.min(MAX_DISTANCE);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = ((1.0 - f64::from(clamped) / f64::from(MAX_DISTANCE)) * 100.0).round() as u8;
    pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tv(c: u8, n: u8, s: u8, f: u8) -> TraitVector {
        TraitVector::new(c, n, s, f).unwrap()
    }

    #[test]
    fn distance_is_symmetric() {
        let a = tv(7, 1, 7, 2);
        let b = tv(1, 7, 2, 6);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn distance_identity_is_zero() {
        let a = tv(4, 4, 4, 4);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn distance_max_is_24() {
        let a = tv(1, 1, 1, 1);
        let b = tv(7, 7, 7, 7);
        assert_eq!(a.distance(&b), MAX_DISTANCE);
    }

    #[rstest]
    #[case(0, 4, 7, 2, "chronotype")]
    #[case(4, 8, 7, 2, "noise_sensitivity")]
    #[case(4, 4, 0, 2, "sociability")]
    #[case(4, 4, 7, 255, "study_focus")]
    fn out_of_range_is_invariant_violation(
        #[case] c: u8,
        #[case] n: u8,
        #[case] s: u8,
        #[case] f: u8,
        #[case] expected: &str,
    ) {
        let err = TraitVector::new(c, n, s, f).unwrap_err();
        match err {
            crate::errors::CoreError::InvariantViolation { dimension, .. } => {
                assert_eq!(dimension, expected);
            }
            other => panic!("expected InvariantViolation, got {other}"),
        }
    }

    #[rstest]
    #[case(0, 100)]
    #[case(12, 50)]
    #[case(24, 0)]
    #[case(6, 75)]
    fn percent_normalization(#[case] score: u32, #[case] expected: u8) {
        assert_eq!(compatibility_percent(score), expected);
    }

    #[test]
    fn percent_floors_past_max() {
        assert_eq!(compatibility_percent(30), 0);
    }
}
