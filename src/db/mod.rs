pub mod queries;
pub mod store;

use crate::report::entity::NewWeeklyReport;
use crate::report::{MoodCount, MoodRecord, SaveError, WeeklyReport};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let database = Self { conn };
        database.init_schema()?;

        Ok(database)
    }

    pub fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }

    pub fn insert_mood_record(&self, user_id: i64, record: &MoodRecord) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO mood_records (user_id, record_date, mood_emoji, intensity, mood_text) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user_id,
                    record.record_date,
                    &record.mood_emoji,
                    record.intensity,
                    record.mood_text.as_deref()
                ],
            )
            .context("Failed to insert mood record")?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn mood_records_between(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodRecord>> {
        let mut statement = self.conn.prepare(
            "SELECT record_date, mood_emoji, intensity, mood_text
             FROM mood_records
             WHERE user_id = ?1 AND record_date >= ?2 AND record_date <= ?3
             ORDER BY record_date ASC, id ASC",
        )?;

        let rows = statement
            .query_map(params![user_id, from, to], |row| {
                Ok(MoodRecord {
                    record_date: row.get(0)?,
                    mood_emoji: row.get(1)?,
                    intensity: row.get(2)?,
                    mood_text: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query mood records")?;

        Ok(rows)
    }

    pub fn weekly_report(
        &self,
        user_id: i64,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyReport>> {
        let row = self
            .conn
            .query_row(
                queries::SELECT_WEEKLY_REPORT,
                params![user_id, week_start],
                |row| {
                    Ok((
                        WeeklyReport {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            week_start: row.get(2)?,
                            week_end: row.get(3)?,
                            summary_text: row.get(4)?,
                            record_count: row.get(5)?,
                            avg_intensity: row.get(6)?,
                            mood_distribution: Vec::new(),
                            created_at: row.get(8)?,
                        },
                        row.get::<_, String>(7)?,
                    ))
                },
            )
            .optional()
            .context("Failed to query weekly report")?;

        row.map(|(mut report, distribution_json)| -> Result<WeeklyReport> {
            report.mood_distribution = serde_json::from_str::<Vec<MoodCount>>(&distribution_json)
                .with_context(|| {
                    format!("Failed to parse mood distribution of weekly report {}", report.id)
                })?;
            Ok(report)
        })
        .transpose()
    }

    /// Inserts a weekly report in its own transaction. Any failure rolls the
    /// transaction back; a `(user_id, week_start)` collision is reported as
    /// [`SaveError::Duplicate`].
    pub fn insert_weekly_report(
        &mut self,
        report: &NewWeeklyReport,
        created_at: i64,
    ) -> std::result::Result<WeeklyReport, SaveError> {
        let distribution_json = serde_json::to_string(report.mood_distribution())
            .context("Failed to serialize mood distribution")?;

        let transaction = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        let inserted = transaction.execute(
            "INSERT INTO weekly_reports (user_id, week_start, week_end, summary_text, record_count, avg_intensity, mood_distribution, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                report.user_id(),
                report.week_start(),
                report.week_end(),
                report.summary_text(),
                report.record_count(),
                report.avg_intensity(),
                &distribution_json,
                created_at
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(error) if is_unique_violation(&error) => return Err(SaveError::Duplicate),
            Err(error) => {
                return Err(SaveError::Storage(
                    anyhow!(error).context("Failed to insert weekly report"),
                ));
            }
        }

        let id = transaction.last_insert_rowid();
        transaction
            .commit()
            .context("Failed to commit weekly report")?;

        Ok(WeeklyReport {
            id,
            user_id: report.user_id(),
            week_start: report.week_start(),
            week_end: report.week_end(),
            summary_text: report.summary_text().map(ToOwned::to_owned),
            record_count: report.record_count(),
            avg_intensity: report.avg_intensity(),
            mood_distribution: report.mood_distribution().to_vec(),
            created_at,
        })
    }

    pub fn insert_session(&self, token: &str, user_id: i64, expires_at: i64) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
                params![token, user_id, expires_at],
            )
            .context("Failed to insert session")?;

        Ok(())
    }

    pub fn session_user(&self, token: &str, now: i64) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > ?2",
                params![token, now],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query session")
    }

    pub fn cleanup_expired_sessions(&self, now: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])
            .context("Failed to clean up expired sessions")?;

        Ok(deleted)
    }
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::Database;
    use crate::report::entity::NewWeeklyReport;
    use crate::report::{MoodCount, MoodRecord, SaveError};
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    fn new_report(user_id: i64) -> NewWeeklyReport {
        NewWeeklyReport::new(
            user_id,
            date("2026-02-16"),
            date("2026-02-22"),
            Some("🌿 Calm week".to_string()),
            3,
            Some(5.3),
            vec![
                MoodCount {
                    emoji: "😊".to_string(),
                    count: 2,
                },
                MoodCount {
                    emoji: "😢".to_string(),
                    count: 1,
                },
            ],
        )
        .expect("valid report")
    }

    #[test]
    fn weekly_report_round_trips_through_sqlite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut database = Database::open(&dir.path().join("moodweek.db")).expect("open db");

        let saved = database
            .insert_weekly_report(&new_report(7), 1_771_200_000)
            .expect("insert");
        let loaded = database
            .weekly_report(7, date("2026-02-16"))
            .expect("query")
            .expect("row present");

        assert_eq!(saved, loaded);
        assert_eq!(loaded.mood_distribution[0].emoji, "😊");
        assert_eq!(database.weekly_report(8, date("2026-02-16")).expect("query"), None);
    }

    #[test]
    fn second_insert_for_same_week_is_duplicate() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("moodweek.db");
        let mut first = Database::open(&path).expect("open db");
        let mut second = Database::open(&path).expect("open db");

        first
            .insert_weekly_report(&new_report(7), 1)
            .expect("first insert");
        let result = second.insert_weekly_report(&new_report(7), 2);

        assert!(matches!(result, Err(SaveError::Duplicate)));
        assert_eq!(
            first
                .weekly_report(7, date("2026-02-16"))
                .expect("query")
                .map(|report| report.created_at),
            Some(1)
        );
    }

    #[test]
    fn mood_records_are_filtered_by_user_and_range() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("moodweek.db")).expect("open db");

        for (user_id, day, emoji) in [
            (7, "2026-02-12", "😴"),
            (7, "2026-02-18", "😊"),
            (7, "2026-02-13", "😢"),
            (8, "2026-02-18", "😡"),
        ] {
            let record = MoodRecord {
                record_date: date(day),
                mood_emoji: emoji.to_string(),
                intensity: 5,
                mood_text: None,
            };
            database.insert_mood_record(user_id, &record).expect("insert");
        }

        let records = database
            .mood_records_between(7, date("2026-02-13"), date("2026-02-19"))
            .expect("query");
        let emojis = records
            .iter()
            .map(|record| record.mood_emoji.as_str())
            .collect::<Vec<_>>();

        assert_eq!(emojis, vec!["😢", "😊"]);
    }

    #[test]
    fn intensity_outside_range_is_rejected_by_schema() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("moodweek.db")).expect("open db");
        let record = MoodRecord {
            record_date: date("2026-02-18"),
            mood_emoji: "😊".to_string(),
            intensity: 11,
            mood_text: None,
        };

        assert!(database.insert_mood_record(7, &record).is_err());
    }

    #[test]
    fn expired_sessions_do_not_resolve() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("moodweek.db")).expect("open db");

        database.insert_session("live", 7, 2_000).expect("insert");
        database.insert_session("stale", 8, 500).expect("insert");

        assert_eq!(database.session_user("live", 1_000).expect("query"), Some(7));
        assert_eq!(database.session_user("stale", 1_000).expect("query"), None);
        assert_eq!(database.session_user("missing", 1_000).expect("query"), None);
        assert_eq!(database.cleanup_expired_sessions(1_000).expect("cleanup"), 1);
    }
}
