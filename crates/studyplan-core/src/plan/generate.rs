//! Plan generation: derives a weekly schedule, goals, and a summary from the
//! onboarding answers.
//!
//! Pure logic. The caller supplies `now`, so the same request and instant
//! always produce the same plan.

use chrono::{DateTime, Utc};

use super::model::{
    DailyGoal, DaySchedule, Mode, PlanSummary, Recommendation, StudyPlan, StudySlot,
};
use super::request::{
    StudyAnswers, days_until, difficulty_or_default, parse_hours_or_default, parse_target_date,
    subjects_or_default,
};

/// Weekday labels, Sunday first.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Hours covered by one study slot.
const HOURS_PER_SLOT: f64 = 2.0;

/// Upper bound on slots per day. Keeps absurd `hoursPerDay` answers from
/// allocating unbounded schedules; totals still use the real hours.
pub const MAX_SLOTS_PER_DAY: usize = 1_000;

/// Start hour of the first slot of the day.
const FIRST_SLOT_HOUR: usize = 8;

const DAILY_GOALS: [&str; 3] = [
    "Review today's content",
    "Do practice exercises",
    "Watch video lessons",
];

const EXERCISE_FOCUS_TITLE: &str = "Focus on exercises";
const EXERCISE_FOCUS_DESCRIPTION: &str =
    "Spend 70% of your study time on practice exercises and 30% on theory.";

const DETAILED_STUDY_TITLE: &str = "Detailed study";
const DETAILED_STUDY_DESCRIPTION: &str =
    "Build mind maps and write summaries for each topic before moving on.";

/// Generate a study plan for `mode` and `answers` as of `now`.
///
/// Never fails: unusable answers fall back to defaults, and an unparsable
/// target date leaves the day and hour totals empty.
pub fn generate_study_plan(mode: &Mode, answers: &StudyAnswers, now: DateTime<Utc>) -> StudyPlan {
    let hours_per_day = parse_hours_or_default(answers.hours_per_day.as_ref());

    let days_until_target = match answers.target_date.as_deref() {
        Some(raw) => match parse_target_date(raw) {
            Some(target) => Some(days_until(target, now)),
            None => {
                tracing::warn!(target_date = raw, "unparsable target date");
                None
            }
        },
        None => {
            tracing::warn!("no target date given");
            None
        }
    };
    if let Some(days) = days_until_target.filter(|d| *d <= 0) {
        tracing::warn!(days, "target date is not in the future");
    }

    let summary = PlanSummary {
        total_study_hours: days_until_target.map(|days| hours_per_day * days as f64),
        days_until_target,
        subjects: subjects_or_default(answers.subjects.as_deref()),
        difficulty: difficulty_or_default(answers.difficulty.as_deref()),
    };

    tracing::debug!(%mode, hours_per_day, ?days_until_target, "generated study plan");

    StudyPlan {
        weekly_schedule: weekly_schedule(hours_per_day),
        daily_goals: daily_goals(),
        recommendations: vec![recommendation_for(mode)],
        summary,
    }
}

/// Number of study slots per day: one per started block of two hours,
/// capped at [`MAX_SLOTS_PER_DAY`].
pub fn slots_per_day(hours_per_day: f64) -> usize {
    let slots = (hours_per_day / HOURS_PER_SLOT).ceil().max(0.0) as usize;
    slots.min(MAX_SLOTS_PER_DAY)
}

/// Build the seven-day schedule. Every day gets the same slots.
pub fn weekly_schedule(hours_per_day: f64) -> Vec<DaySchedule> {
    let slots: Vec<StudySlot> = (0..slots_per_day(hours_per_day))
        .map(|i| StudySlot {
            subject: format!("Subject {}", i + 1),
            time: format!("{}:00", FIRST_SLOT_HOUR + 2 * i),
        })
        .collect();

    WEEKDAYS
        .iter()
        .map(|day| DaySchedule {
            day: (*day).to_string(),
            subjects: slots.clone(),
        })
        .collect()
}

/// The fixed checklist returned with every plan.
pub fn daily_goals() -> Vec<DailyGoal> {
    DAILY_GOALS
        .iter()
        .map(|goal| DailyGoal {
            goal: (*goal).to_string(),
            completed: false,
        })
        .collect()
}

/// Pick the recommendation for a mode.
pub fn recommendation_for(mode: &Mode) -> Recommendation {
    let (title, description) = match mode {
        Mode::Apru1b => (EXERCISE_FOCUS_TITLE, EXERCISE_FOCUS_DESCRIPTION),
        Mode::ApruReasoning => (DETAILED_STUDY_TITLE, DETAILED_STUDY_DESCRIPTION),
        Mode::Unknown(other) => {
            tracing::debug!(mode = %other, "unrecognized mode; using detailed study");
            (DETAILED_STUDY_TITLE, DETAILED_STUDY_DESCRIPTION)
        }
    };
    Recommendation {
        title: title.to_string(),
        description: description.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
