pub const CREATE_MOOD_RECORDS: &str = r#"
CREATE TABLE IF NOT EXISTS mood_records (
  id           INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id      INTEGER NOT NULL,
  record_date  TEXT NOT NULL,
  mood_emoji   TEXT NOT NULL,
  intensity    INTEGER NOT NULL CHECK (intensity BETWEEN 0 AND 10),
  mood_text    TEXT
);
"#;

pub const CREATE_WEEKLY_REPORTS: &str = r#"
CREATE TABLE IF NOT EXISTS weekly_reports (
  id                INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id           INTEGER NOT NULL,
  week_start        TEXT NOT NULL,
  week_end          TEXT NOT NULL,
  summary_text      TEXT,
  record_count      INTEGER NOT NULL DEFAULT 0,
  avg_intensity     REAL,
  mood_distribution TEXT NOT NULL DEFAULT '[]',
  created_at        INTEGER NOT NULL,
  CONSTRAINT uk_user_week UNIQUE (user_id, week_start)
);
"#;

pub const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
  token        TEXT PRIMARY KEY,
  user_id      INTEGER NOT NULL,
  expires_at   INTEGER NOT NULL
);
"#;

pub const INDEX_MOOD_RECORDS_USER_DATE: &str =
    "CREATE INDEX IF NOT EXISTS idx_mood_records_user_date ON mood_records(user_id, record_date);";

pub const INDEX_WEEKLY_REPORTS_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_weekly_reports_user ON weekly_reports(user_id);";

pub const SELECT_WEEKLY_REPORT: &str = "SELECT id, user_id, week_start, week_end, summary_text, record_count, avg_intensity, mood_distribution, created_at
     FROM weekly_reports
     WHERE user_id = ?1 AND week_start = ?2";

pub fn schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_MOOD_RECORDS,
        CREATE_WEEKLY_REPORTS,
        CREATE_SESSIONS,
        INDEX_MOOD_RECORDS_USER_DATE,
        INDEX_WEEKLY_REPORTS_USER,
    ]
}
