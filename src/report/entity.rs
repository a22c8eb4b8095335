use crate::report::aggregate::round_one_decimal;
use crate::report::extract::MAX_SUMMARY_CHARS;
use crate::report::MoodCount;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("user_id must be a positive integer")]
    InvalidUserId,

    #[error("week_end must not be before week_start")]
    InvertedWeek,

    #[error("record_count must be non-negative")]
    NegativeRecordCount,

    #[error("avg_intensity must be between 0 and 10")]
    IntensityOutOfRange,

    #[error("summary_text must be at most 3000 characters")]
    SummaryTooLong,
}

/// A weekly report that passed validation and has not been stored yet.
/// [`NewWeeklyReport::new`] is the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeeklyReport {
    user_id: i64,
    week_start: NaiveDate,
    week_end: NaiveDate,
    summary_text: Option<String>,
    record_count: i64,
    avg_intensity: Option<f64>,
    mood_distribution: Vec<MoodCount>,
}

impl NewWeeklyReport {
    pub fn new(
        user_id: i64,
        week_start: NaiveDate,
        week_end: NaiveDate,
        summary_text: Option<String>,
        record_count: i64,
        avg_intensity: Option<f64>,
        mood_distribution: Vec<MoodCount>,
    ) -> Result<Self, ValidationError> {
        if user_id <= 0 {
            return Err(ValidationError::InvalidUserId);
        }

        if week_end < week_start {
            return Err(ValidationError::InvertedWeek);
        }

        if record_count < 0 {
            return Err(ValidationError::NegativeRecordCount);
        }

        if avg_intensity.is_some_and(|value| !(0.0..=10.0).contains(&value)) {
            return Err(ValidationError::IntensityOutOfRange);
        }

        if summary_text
            .as_deref()
            .is_some_and(|text| text.chars().count() > MAX_SUMMARY_CHARS)
        {
            return Err(ValidationError::SummaryTooLong);
        }

        Ok(Self {
            user_id,
            week_start,
            week_end,
            summary_text,
            record_count,
            avg_intensity: avg_intensity.map(round_one_decimal),
            mood_distribution,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_end
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary_text.as_deref()
    }

    pub fn record_count(&self) -> i64 {
        self.record_count
    }

    pub fn avg_intensity(&self) -> Option<f64> {
        self.avg_intensity
    }

    pub fn mood_distribution(&self) -> &[MoodCount] {
        &self.mood_distribution
    }
}
