//! Study plan generation: request validation, answer parsing, and the generator.

pub mod generate;
pub mod model;
pub mod request;

pub use generate::{MAX_SLOTS_PER_DAY, WEEKDAYS, generate_study_plan, slots_per_day};
pub use model::{
    DailyGoal, DaySchedule, Difficulty, Mode, PlanSummary, Recommendation, StudyPlan, StudySlot,
};
pub use request::{
    DEFAULT_HOURS_PER_DAY, DEFAULT_SUBJECTS, HoursInput, RequestError, StudyAnswers,
    StudyPlanRequest, parse_hours_or_default,
};
