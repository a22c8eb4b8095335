use crate::report::aggregate::WeeklyAggregate;
use crate::report::{MoodCount, MoodRecord};

pub const SYSTEM_PROMPT: &str = concat!(
    "You are a warm, supportive counselor. ",
    "Read the weekly emotion data and summarize it briefly in 2-3 paragraphs. ",
    "Start each paragraph with a single emoji. ",
    r#"Respond with this JSON only: {"summary_text": "..."} "#,
    "No text outside the JSON."
);

const MAX_TOP_MOODS: usize = 5;
const MAX_SAMPLE_RECORDS: usize = 10;
const MAX_TEXT_PREVIEW_CHARS: usize = 30;
const MISSING_TEXT_PLACEHOLDER: &str = "none";

/// Renders the user prompt for one week. The output depends only on the
/// arguments.
pub fn build_user_prompt(records: &[MoodRecord], aggregate: &WeeklyAggregate) -> String {
    let record_lines = records
        .iter()
        .take(MAX_SAMPLE_RECORDS)
        .map(render_record_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "[Data] {} records, average intensity {:.1}/10\nMood distribution: {}\n\n[Records]\n{}\n\n[Task] Write 2-3 paragraphs: 1) summary of this week 2) a notable emotion 3) one actionable suggestion. JSON only: {{\"summary_text\": \"...\"}}",
        aggregate.record_count,
        aggregate.avg_intensity.unwrap_or_default(),
        top_moods(&aggregate.mood_distribution),
        record_lines
    )
}

/// Expects the distribution already sorted by descending count.
fn top_moods(distribution: &[MoodCount]) -> String {
    distribution
        .iter()
        .take(MAX_TOP_MOODS)
        .map(|entry| format!("{}({})", entry.emoji, entry.count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_record_line(record: &MoodRecord) -> String {
    let preview = record
        .mood_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.chars().take(MAX_TEXT_PREVIEW_CHARS).collect::<String>())
        .unwrap_or_else(|| MISSING_TEXT_PLACEHOLDER.to_string());

    format!(
        "  - {} | {} (intensity {}/10) | {}",
        record.record_date.format("%Y-%m-%d"),
        record.mood_emoji,
        record.intensity,
        preview
    )
}

#[cfg(test)]
mod tests {
    use super::{SYSTEM_PROMPT, build_user_prompt};
    use crate::report::MoodRecord;
    use crate::report::aggregate::WeeklyAggregate;
    use chrono::{Duration, NaiveDate};

    fn records(count: usize) -> Vec<MoodRecord> {
        let start = NaiveDate::from_ymd_opt(2026, 2, 16).expect("valid date");
        let emojis = ["😊", "😢", "😡", "😴", "😐", "🤩", "😊"];

        (0..count)
            .map(|index| MoodRecord {
                record_date: start + Duration::days((index % 7) as i64),
                mood_emoji: emojis[index % emojis.len()].to_string(),
                intensity: (index % 11) as i64,
                mood_text: (index % 2 == 0).then(|| format!("entry {index} {}", "x".repeat(40))),
            })
            .collect()
    }

    #[test]
    fn prompt_is_deterministic() {
        let records = records(4);
        let aggregate = WeeklyAggregate::from_records(&records);

        assert_eq!(
            build_user_prompt(&records, &aggregate),
            build_user_prompt(&records, &aggregate)
        );
    }

    #[test]
    fn header_counts_every_record_but_samples_ten() {
        let records = records(12);
        let aggregate = WeeklyAggregate::from_records(&records);
        let prompt = build_user_prompt(&records, &aggregate);

        assert!(prompt.starts_with("[Data] 12 records, average intensity "));
        assert_eq!(prompt.lines().filter(|line| line.starts_with("  - ")).count(), 10);
    }

    #[test]
    fn lists_at_most_five_moods_by_count() {
        let records = records(7);
        let aggregate = WeeklyAggregate::from_records(&records);
        let prompt = build_user_prompt(&records, &aggregate);

        let mood_line = prompt
            .lines()
            .find(|line| line.starts_with("Mood distribution: "))
            .expect("mood line");
        assert_eq!(mood_line, "Mood distribution: 😊(2), 😢(1), 😡(1), 😴(1), 😐(1)");
    }

    #[test]
    fn record_text_is_previewed_or_replaced() {
        let records = records(2);
        let aggregate = WeeklyAggregate::from_records(&records);
        let prompt = build_user_prompt(&records, &aggregate);

        assert!(prompt.contains("  - 2026-02-16 | 😊 (intensity 0/10) | entry 0 xxxxxxxxxxxxxxxxxxxxxx\n"));
        assert!(prompt.contains("  - 2026-02-17 | 😢 (intensity 1/10) | none\n"));
    }

    #[test]
    fn prompts_demand_strict_json() {
        let records = records(1);
        let aggregate = WeeklyAggregate::from_records(&records);
        let prompt = build_user_prompt(&records, &aggregate);

        assert!(prompt.ends_with(r#"JSON only: {"summary_text": "..."}"#));
        assert!(SYSTEM_PROMPT.contains(r#"{"summary_text": "..."}"#));
        assert!(SYSTEM_PROMPT.contains("counselor"));
    }
}
