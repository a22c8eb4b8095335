use crate::report::{MoodCount, MoodRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAggregate {
    pub record_count: usize,
    pub avg_intensity: Option<f64>,
    pub mood_distribution: Vec<MoodCount>,
}

impl WeeklyAggregate {
    pub fn from_records(records: &[MoodRecord]) -> Self {
        let total_intensity = records.iter().map(|record| record.intensity).sum::<i64>();
        let avg_intensity = (!records.is_empty())
            .then(|| round_one_decimal(total_intensity as f64 / records.len() as f64));

        Self {
            record_count: records.len(),
            avg_intensity,
            mood_distribution: mood_distribution(records),
        }
    }
}

/// Emoji histogram sorted by descending count. Equal counts keep the order in
/// which the emoji was first seen.
pub fn mood_distribution(records: &[MoodRecord]) -> Vec<MoodCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<MoodCount> = Vec::new();

    for record in records {
        match positions.get(record.mood_emoji.as_str()) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(record.mood_emoji.as_str(), counts.len());
                counts.push(MoodCount {
                    emoji: record.mood_emoji.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|left, right| right.count.cmp(&left.count));
    counts
}

/// Rounds to one decimal place. Exact ties go to the even digit, so 5.25
/// becomes 5.2.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
