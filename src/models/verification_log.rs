use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per issued verification token. `verified_at` is stamped
/// exactly once, when the token is consumed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailVerificationLog {
    pub id: Uuid,
    pub applicant_id: Option<Uuid>,
    pub email: String,
    pub token: String,
    pub sent_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}
