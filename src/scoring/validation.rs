use super::pipeline::{Answers, Stage, STAGE_COUNT};
use super::scorecard::{Metric, MetricScore, Metrics, METRIC_COUNT};
use crate::error::ValidationError;

/// Validate ten raw metric scores.
/// Returns all validation errors at once (not just the first).
pub fn validate_metrics(raw: &[i64]) -> Result<Metrics, Vec<ValidationError>> {
    if raw.len() != METRIC_COUNT {
        return Err(vec![ValidationError::MetricCount {
            expected: METRIC_COUNT,
            actual: raw.len(),
        }]);
    }

    let mut errors = Vec::new();
    let mut scores = [MetricScore::NEUTRAL; METRIC_COUNT];

    for (i, (metric, value)) in Metric::ALL.iter().zip(raw).enumerate() {
        match MetricScore::new(*metric, *value) {
            Ok(score) => scores[i] = score,
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(Metrics::from_scores(scores))
    } else {
        Err(errors)
    }
}

/// Validate six raw yes/no answers.
/// Returns all validation errors at once (not just the first).
pub fn validate_answers<S: AsRef<str>>(raw: &[S]) -> Result<Answers, Vec<ValidationError>> {
    if raw.len() != STAGE_COUNT {
        return Err(vec![ValidationError::AnswerCount {
            expected: STAGE_COUNT,
            actual: raw.len(),
        }]);
    }

    let mut errors = Vec::new();
    let mut answers = Answers::default();

    for (stage, input) in Stage::ALL.iter().zip(raw) {
        match parse_answer(*stage, input.as_ref()) {
            Ok(passed) => answers.set(*stage, passed),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(answers)
    } else {
        Err(errors)
    }
}

/// Parse one yes/no word. Accepts the checkbox glyphs too.
pub fn parse_answer(stage: Stage, input: &str) -> Result<bool, ValidationError> {
    let normalized = input.trim().to_lowercase();
    match normalized.as_str() {
        "yes" | "y" | "true" | "1" | "✅" | "✅ yes" => Ok(true),
        "no" | "n" | "false" | "0" | "❌" | "❌ no" => Ok(false),
        _ => Err(ValidationError::InvalidAnswer {
            stage: stage.title(),
            input: input.to_string(),
        }),
    }
}
