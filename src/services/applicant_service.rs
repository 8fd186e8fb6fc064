use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::applicant::{
    Applicant, ApplicantStatus, ApplicantSummary, CommunicationPreferences, NewApplicant,
};
use crate::utils::phone::normalize_phone;

const APPLICANT_COLUMNS: &str = "id, full_name, email, email_confirmed, phone, phone_normalized, \
     positions, experience_years, cover_letter, job_posting_url, linkedin_url, portfolio_url, \
     resume_url, resume_filename, email_verified, email_verification_token, token_expiry, \
     status, admin_notes, newsletter_opt_in, job_notifications_opt_in, sms_notifications_opt_in, \
     utm_source, utm_medium, utm_campaign, referrer, landing_page, submission_language, \
     browser_language, created_at, updated_at";

#[derive(Clone)]
pub struct ApplicantService {
    pool: PgPool,
}

impl ApplicantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Duplicate check: normalizes the raw phone and looks for an
    /// applicant already holding that digits-only value. Read-only.
    pub async fn find_by_phone(&self, raw_phone: &str) -> Result<Option<ApplicantSummary>> {
        let normalized = normalize_phone(raw_phone);
        if normalized.is_empty() {
            return Ok(None);
        }
        let summary = sqlx::query_as::<_, ApplicantSummary>(
            "SELECT id, full_name, email, created_at, email_verified \
             FROM applicants WHERE phone_normalized = $1",
        )
        .bind(&normalized)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summary)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Applicant>> {
        let applicant = sqlx::query_as::<_, Applicant>(&format!(
            "SELECT {} FROM applicants WHERE id = $1",
            APPLICANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(applicant)
    }

    pub async fn list(&self) -> Result<Vec<Applicant>> {
        let applicants = sqlx::query_as::<_, Applicant>(&format!(
            "SELECT {} FROM applicants ORDER BY created_at DESC",
            APPLICANT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(applicants)
    }

    /// Inserts the applicant with `status = 'new'` and the verification
    /// token set. The unique index on `phone_normalized` is the real
    /// enforcement point for duplicates; a constraint violation here is
    /// reported the same way as a pre-insert duplicate hit.
    pub async fn create(&self, new: NewApplicant) -> Result<Applicant> {
        let inserted = sqlx::query_as::<_, Applicant>(&format!(
            "INSERT INTO applicants (\
                full_name, email, email_confirmed, phone, phone_normalized, positions, \
                experience_years, cover_letter, job_posting_url, linkedin_url, portfolio_url, \
                resume_url, resume_filename, email_verified, email_verification_token, \
                token_expiry, status, newsletter_opt_in, job_notifications_opt_in, \
                sms_notifications_opt_in, utm_source, utm_medium, utm_campaign, referrer, \
                landing_page, submission_language, browser_language) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, FALSE, $14, $15, \
                'new', $16, $17, $18, $19, $20, $21, $22, $23, $24, $25) \
             RETURNING {}",
            APPLICANT_COLUMNS
        ))
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.email_confirmed)
        .bind(&new.phone)
        .bind(&new.phone_normalized)
        .bind(&new.positions)
        .bind(&new.experience_years)
        .bind(&new.cover_letter)
        .bind(&new.job_posting_url)
        .bind(&new.linkedin_url)
        .bind(&new.portfolio_url)
        .bind(&new.resume_url)
        .bind(&new.resume_filename)
        .bind(&new.email_verification_token)
        .bind(new.token_expiry)
        .bind(new.newsletter_opt_in)
        .bind(new.job_notifications_opt_in)
        .bind(new.sms_notifications_opt_in)
        .bind(&new.utm_source)
        .bind(&new.utm_medium)
        .bind(&new.utm_campaign)
        .bind(&new.referrer)
        .bind(&new.landing_page)
        .bind(&new.submission_language)
        .bind(&new.browser_language)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(applicant) => Ok(applicant),
            Err(err) if is_phone_unique_violation(&err) => {
                // Two submissions raced past the duplicate check; the
                // constraint caught the second one.
                let existing = self.find_by_phone(&new.phone).await?;
                match existing {
                    Some(summary) => Err(Error::DuplicateApplicant(Box::new(summary))),
                    None => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Flips the verified flag and clears the token pair in one update.
    pub async fn mark_verified(&self, id: Uuid) -> Result<Applicant> {
        let applicant = sqlx::query_as::<_, Applicant>(&format!(
            "UPDATE applicants \
             SET email_verified = TRUE, email_verification_token = NULL, token_expiry = NULL, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            APPLICANT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(applicant)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicantStatus,
        notes: Option<String>,
    ) -> Result<Applicant> {
        let applicant = sqlx::query_as::<_, Applicant>(&format!(
            "UPDATE applicants \
             SET status = $1, admin_notes = COALESCE($2, admin_notes), updated_at = NOW() \
             WHERE id = $3 \
             RETURNING {}",
            APPLICANT_COLUMNS
        ))
        .bind(status.as_str())
        .bind(notes)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(applicant)
    }

    pub async fn preferences_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CommunicationPreferences>> {
        let prefs = sqlx::query_as::<_, CommunicationPreferences>(
            "SELECT newsletter_opt_in, job_notifications_opt_in, sms_notifications_opt_in \
             FROM applicants WHERE email = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(prefs)
    }

    pub async fn update_preferences(
        &self,
        email: &str,
        newsletter: Option<bool>,
        job_notifications: Option<bool>,
        sms_notifications: Option<bool>,
    ) -> Result<CommunicationPreferences> {
        let prefs = sqlx::query_as::<_, CommunicationPreferences>(
            "UPDATE applicants \
             SET newsletter_opt_in = COALESCE($1, newsletter_opt_in), \
                 job_notifications_opt_in = COALESCE($2, job_notifications_opt_in), \
                 sms_notifications_opt_in = COALESCE($3, sms_notifications_opt_in), \
                 updated_at = NOW() \
             WHERE email = $4 \
             RETURNING newsletter_opt_in, job_notifications_opt_in, sms_notifications_opt_in",
        )
        .bind(newsletter)
        .bind(job_notifications)
        .bind(sms_notifications)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("No application found for this email".to_string()))?;
        Ok(prefs)
    }
}

fn is_phone_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .constraint()
            .is_some_and(|c| c == "applicants_phone_normalized_key"),
        _ => false,
    }
}
