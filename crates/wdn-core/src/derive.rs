//! Trait derivation from questionnaire answers.
//!
//! The `TraitSource` seam lets the surrounding application swap the shipped
//! deterministic deriver for an alternative source (e.g., a generative model
//! scored behind the same output contract). Everything downstream of the
//! derived vector — scoring, allocation, status — is source-agnostic.

use crate::entities::AnswerPair;
use crate::errors::CoreError;
use crate::profile::TraitVector;

/// Question key feeding the chronotype dimension.
pub const Q_SLEEP_SCHEDULE: &str = "sleepSchedule";
/// Question key feeding the noise sensitivity dimension.
pub const Q_NOISE_TOLERANCE: &str = "noiseTolerance";
/// Question key feeding the sociability dimension.
pub const Q_SOCIAL_PREFERENCE: &str = "socialPreference";
/// Question key feeding the study focus dimension.
pub const Q_STUDY_HOURS: &str = "studyHours";

/// Neutral default substituted when a required answer is missing or
/// unrecognized. A malformed response is a policy-recovered condition,
/// never a surfaced error.
pub const NEUTRAL: u8 = 4;

/// A source of trait vectors for one student's questionnaire answers.
///
/// Implementations must be deterministic with respect to their own inputs
/// and must return vectors satisfying the [1,7] bound, or
/// `CoreError::InvariantViolation`.
pub trait TraitSource: Send + Sync {
    /// Derive a trait vector from raw `{question_key, answer}` pairs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvariantViolation` if a derived dimension falls
    /// outside [1,7] (a bug in the source, not bad user input).
    fn derive(&self, answers: &[AnswerPair]) -> Result<TraitVector, CoreError>;
}

/// Deterministic rule-based trait deriver.
///
/// Pure lookup tables per question; the same input always yields the same
/// output. Missing or unrecognized answers map to the neutral default 4.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedDeriver;

impl RuleBasedDeriver {
    fn answer_for<'a>(answers: &'a [AnswerPair], key: &str) -> Option<&'a str> {
        answers
            .iter()
            .find(|a| a.question_key == key)
            .map(|a| a.answer.as_str())
    }

    fn chronotype(answer: Option<&str>) -> u8 {
        match answer {
            Some("early") => 1,
            Some("night") => 7,
            // "average", missing, or unrecognized
            _ => NEUTRAL,
        }
    }

    fn noise_sensitivity(answer: Option<&str>) -> u8 {
        match answer {
            Some("quiet") => 1,
            Some("low") => 3,
            Some("moderate") => 5,
            Some("high") => 7,
            _ => NEUTRAL,
        }
    }

    fn sociability(answer: Option<&str>) -> u8 {
        match answer {
            Some("quiet") => 2,
            Some("very") => 7,
            // "moderate", missing, or unrecognized
            _ => NEUTRAL,
        }
    }

    fn study_focus(answer: Option<&str>) -> u8 {
        match answer {
            Some("1-2") => 2,
            Some("3-4") => 4,
            Some("5-6") => 6,
            Some("7+") => 7,
            _ => NEUTRAL,
        }
    }
}

impl TraitSource for RuleBasedDeriver {
    fn derive(&self, answers: &[AnswerPair]) -> Result<TraitVector, CoreError> {
        TraitVector::new(
            Self::chronotype(Self::answer_for(answers, Q_SLEEP_SCHEDULE)),
            Self::noise_sensitivity(Self::answer_for(answers, Q_NOISE_TOLERANCE)),
            Self::sociability(Self::answer_for(answers, Q_SOCIAL_PREFERENCE)),
            Self::study_focus(Self::answer_for(answers, Q_STUDY_HOURS)),
        )
    }
}
