use crate::config::Config;
use crate::db::Database;
use anyhow::{Result, bail};
use chrono::{Duration, Utc};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "userToken";

pub trait SessionValidator: Send + Sync {
    /// Resolves a session token to its user, or `None` when the token is
    /// unknown or expired.
    fn validate_session(&self, token: &str) -> Result<Option<i64>>;
}

pub struct IssuedSession {
    pub token: String,
    pub expires_at: i64,
}

pub fn issue_session(config: &Config, user_id: i64) -> Result<IssuedSession> {
    if user_id <= 0 {
        bail!("user id must be a positive integer");
    }

    let token = Uuid::new_v4().simple().to_string();
    let now = Utc::now();
    let expires_at = (now + Duration::hours(i64::from(config.session_ttl_hours))).timestamp();

    let database = Database::open(&config.db_path)?;
    database.cleanup_expired_sessions(now.timestamp())?;
    database.insert_session(&token, user_id, expires_at)?;

    Ok(IssuedSession { token, expires_at })
}
