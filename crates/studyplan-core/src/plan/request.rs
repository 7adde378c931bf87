//! Incoming generation requests: presence validation and lenient answer parsing.
//!
//! Validation here is deliberately shallow. Only the presence of `mode` and
//! `answers` is enforced; individual answers fall back to defaults instead of
//! failing the request.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::model::{Difficulty, Mode};

/// Hours per day used when the answer is missing or unusable.
pub const DEFAULT_HOURS_PER_DAY: f64 = 2.0;

/// Subjects used when the answer is missing or empty.
pub const DEFAULT_SUBJECTS: [&str; 2] = ["Matemática", "Português"];

/// Errors from validating a raw generation request body.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing mode")]
    MissingMode,

    #[error("mode must be a string")]
    InvalidMode,

    #[error("missing answers")]
    MissingAnswers,

    #[error("answers must be a JSON object")]
    AnswersNotAnObject,
}

/// Raw hours-per-day answer: the onboarding form may send a number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoursInput {
    Number(f64),
    Text(String),
}

/// The onboarding answers. Every field is optional, and a field of the wrong
/// JSON type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyAnswers {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<HoursInput>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// Deserialize one answer, mapping `null` and unusable shapes to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            tracing::debug!(%value, %err, "ignoring malformed answer");
            Ok(None)
        }
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanRequest {
    pub mode: Mode,
    pub answers: StudyAnswers,
}

impl StudyPlanRequest {
    /// Validate a raw JSON body of the form `{mode, answers}`.
    ///
    /// `mode` must be a non-empty string and `answers` an object.
    /// Unknown extra fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let obj = body.as_object().ok_or(RequestError::NotAnObject)?;

        let mode = match obj.get("mode") {
            None | Some(Value::Null) => return Err(RequestError::MissingMode),
            Some(Value::String(s)) if s.is_empty() => return Err(RequestError::MissingMode),
            Some(Value::String(s)) => Mode::from(s.as_str()),
            Some(_) => return Err(RequestError::InvalidMode),
        };

        let answers = match obj.get("answers") {
            None | Some(Value::Null) => return Err(RequestError::MissingAnswers),
            Some(v) if !v.is_object() => return Err(RequestError::AnswersNotAnObject),
            Some(v) => StudyAnswers::deserialize(v).unwrap_or_else(|err| {
                tracing::debug!(%err, "answers unusable; using defaults");
                StudyAnswers::default()
            }),
        };

        Ok(Self { mode, answers })
    }
}

// ---------------------------------------------------------------------------
// Answer parsing
// ---------------------------------------------------------------------------

/// Resolve the hours-per-day answer, substituting [`DEFAULT_HOURS_PER_DAY`]
/// when it is missing, unparsable, non-finite, or not strictly positive.
pub fn parse_hours_or_default(input: Option<&HoursInput>) -> f64 {
    let parsed = match input {
        Some(HoursInput::Number(n)) => Some(*n),
        Some(HoursInput::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };

    match parsed {
        Some(h) if h.is_finite() && h > 0.0 => h,
        _ => {
            tracing::debug!(?input, "hoursPerDay unusable; using default");
            DEFAULT_HOURS_PER_DAY
        }
    }
}

/// Parse a target date as either `YYYY-MM-DD` (UTC midnight) or RFC 3339.
pub fn parse_target_date(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days from `now` until `target`, rounded up. Negative for past targets.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const MILLIS_PER_DAY: i64 = 86_400_000;
    let millis = (target - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Resolve the subjects answer, falling back to [`DEFAULT_SUBJECTS`].
pub fn subjects_or_default(subjects: Option<&[String]>) -> Vec<String> {
    match subjects {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => DEFAULT_SUBJECTS.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Resolve the difficulty answer, falling back to `Intermediário`.
///
/// Levels outside [`Difficulty::ALL`] are echoed as given.
pub fn difficulty_or_default(difficulty: Option<&str>) -> String {
    match difficulty {
        Some(d) if !d.is_empty() => {
            if let Err(err) = d.parse::<Difficulty>() {
                tracing::debug!(%err, "difficulty is not a known level; keeping it");
            }
            d.to_string()
        }
        _ => Difficulty::default().to_string(),
    }
}
