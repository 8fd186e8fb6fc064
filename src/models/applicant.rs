use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Applicant {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub email_confirmed: String,
    pub phone: String,
    pub phone_normalized: String,
    pub positions: Vec<String>,
    pub experience_years: Option<String>,
    pub cover_letter: Option<String>,
    pub job_posting_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: String,
    pub resume_filename: String,
    pub email_verified: bool,
    pub email_verification_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub newsletter_opt_in: bool,
    pub job_notifications_opt_in: bool,
    pub sms_notifications_opt_in: bool,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub referrer: Option<String>,
    pub landing_page: Option<String>,
    pub submission_language: Option<String>,
    pub browser_language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the intake pipeline persists for a new applicant. Built by
/// the submission orchestrator once validation, duplicate check, and the
/// resume upload have all succeeded.
#[derive(Debug, Clone)]
pub struct NewApplicant {
    pub full_name: String,
    pub email: String,
    pub email_confirmed: String,
    pub phone: String,
    pub phone_normalized: String,
    pub positions: Vec<String>,
    pub experience_years: Option<String>,
    pub cover_letter: Option<String>,
    pub job_posting_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_url: String,
    pub resume_filename: String,
    pub email_verification_token: String,
    pub token_expiry: DateTime<Utc>,
    pub newsletter_opt_in: bool,
    pub job_notifications_opt_in: bool,
    pub sms_notifications_opt_in: bool,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub referrer: Option<String>,
    pub landing_page: Option<String>,
    pub submission_language: Option<String>,
    pub browser_language: Option<String>,
}

/// Shortened view of an existing applicant, returned when a duplicate
/// phone number is detected so the user sees who already applied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub email_verified: bool,
}

/// Review pipeline states. Intake only ever writes `New`; every other
/// value is set through the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    New,
    Reviewing,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewing => "reviewing",
            Self::Shortlisted => "shortlisted",
            Self::Rejected => "rejected",
            Self::Hired => "hired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "reviewing" => Some(Self::Reviewing),
            "shortlisted" => Some(Self::Shortlisted),
            "rejected" => Some(Self::Rejected),
            "hired" => Some(Self::Hired),
            _ => None,
        }
    }
}

/// The three communication-preference booleans, read and written by the
/// unsubscribe flow via email lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunicationPreferences {
    pub newsletter_opt_in: bool,
    pub job_notifications_opt_in: bool,
    pub sms_notifications_opt_in: bool,
}
