use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Study mode selected during onboarding.
///
/// Unrecognized identifiers are kept verbatim in [`Mode::Unknown`] so they
/// serialize back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    /// `APRU_1b`: exercise-heavy preparation.
    Apru1b,
    /// `APRU_REASONING`: detailed, theory-first study.
    ApruReasoning,
    Unknown(String),
}

impl Mode {
    pub const APRU_1B: &str = "APRU_1b";
    pub const APRU_REASONING: &str = "APRU_REASONING";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Apru1b => Self::APRU_1B,
            Self::ApruReasoning => Self::APRU_REASONING,
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        match s.as_str() {
            Self::APRU_1B => Self::Apru1b,
            Self::APRU_REASONING => Self::ApruReasoning,
            _ => Self::Unknown(s),
        }
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Unknown(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------

/// Self-reported difficulty level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Iniciante")]
    Beginner,
    #[default]
    #[serde(rename = "Intermediário")]
    Intermediate,
    #[serde(rename = "Avançado")]
    Advanced,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Beginner => "Iniciante",
            Self::Intermediate => "Intermediário",
            Self::Advanced => "Avançado",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Iniciante" => Ok(Self::Beginner),
            "Intermediário" => Ok(Self::Intermediate),
            "Avançado" => Ok(Self::Advanced),
            other => Err(DifficultyParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Difficulty`] string.
#[derive(Debug, Clone)]
pub struct DifficultyParseError(pub String);

impl fmt::Display for DifficultyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid difficulty: {:?}", self.0)
    }
}

impl std::error::Error for DifficultyParseError {}

// ---------------------------------------------------------------------------
// Generated plan
// ---------------------------------------------------------------------------

/// A generated study plan. Exists only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub weekly_schedule: Vec<DaySchedule>,
    pub daily_goals: Vec<DailyGoal>,
    pub recommendations: Vec<Recommendation>,
    pub summary: PlanSummary,
}

/// One weekday of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub subjects: Vec<StudySlot>,
}

/// One study block within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySlot {
    pub subject: String,
    /// Start time as `H:00`. Not wrapped at midnight.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub goal: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

/// Totals derived from the answers.
///
/// `days_until_target` and `total_study_hours` are `None` when the target
/// date could not be parsed; they serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    #[serde(serialize_with = "serialize_hours")]
    pub total_study_hours: Option<f64>,
    pub days_until_target: Option<i64>,
    pub subjects: Vec<String>,
    pub difficulty: String,
}

/// Write whole hour counts as JSON integers (`40`, not `40.0`).
fn serialize_hours<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    // Beyond 2^53 an f64 no longer maps one-to-one onto integers.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() <= MAX_EXACT => serializer.serialize_i64(*v as i64),
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}
