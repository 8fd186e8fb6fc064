use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::applicant::Applicant;
use crate::models::verification_log::EmailVerificationLog;
use crate::services::applicant_service::ApplicantService;
use crate::services::notification_service::NotificationService;

const LOG_COLUMNS: &str = "id, applicant_id, email, token, sent_at, verified_at";

/// Terminal outcomes of consuming one verification token.
#[derive(Debug)]
pub enum VerificationOutcome {
    /// Fresh token: the log row was stamped and the applicant flipped to
    /// verified. `None` only when the applicant row has since been
    /// deleted.
    Success(Option<Box<Applicant>>),
    /// The link was already used. Nothing is re-written and no second
    /// admin notification fires.
    AlreadyVerified(Option<Box<Applicant>>),
    /// The token matches no issued row.
    UnknownToken,
}

#[derive(Clone)]
pub struct VerificationService {
    pool: PgPool,
    applicants: ApplicantService,
    notifications: NotificationService,
}

impl VerificationService {
    pub fn new(
        pool: PgPool,
        applicants: ApplicantService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            applicants,
            notifications,
        }
    }

    /// Records the issued token right after the applicant insert.
    pub async fn create_log(
        &self,
        applicant_id: Uuid,
        email: &str,
        token: &str,
    ) -> Result<EmailVerificationLog> {
        let log = sqlx::query_as::<_, EmailVerificationLog>(&format!(
            "INSERT INTO email_verification_log (applicant_id, email, token) \
             VALUES ($1, $2, $3) \
             RETURNING {}",
            LOG_COLUMNS
        ))
        .bind(applicant_id)
        .bind(email)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    /// Consumes a token. Stamping `verified_at` is guarded with
    /// `verified_at IS NULL`, so a concurrent re-visit of the same link
    /// resolves to `AlreadyVerified` instead of double-firing.
    ///
    /// `token_expiry` is recorded at issuance but deliberately not
    /// checked here; whether links should ever expire is still an open
    /// product decision.
    pub async fn verify_token(&self, token: &str) -> Result<VerificationOutcome> {
        let log = sqlx::query_as::<_, EmailVerificationLog>(&format!(
            "SELECT {} FROM email_verification_log WHERE token = $1",
            LOG_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(log) = log else {
            return Ok(VerificationOutcome::UnknownToken);
        };

        if log.verified_at.is_some() {
            return self.already_verified(log.applicant_id).await;
        }

        let stamped = sqlx::query(
            "UPDATE email_verification_log SET verified_at = NOW() \
             WHERE id = $1 AND verified_at IS NULL",
        )
        .bind(log.id)
        .execute(&self.pool)
        .await?;

        if stamped.rows_affected() == 0 {
            return self.already_verified(log.applicant_id).await;
        }

        let Some(applicant_id) = log.applicant_id else {
            // Applicant row was deleted after the token went out; the
            // log row is still stamped so re-visits stay idempotent.
            return Ok(VerificationOutcome::Success(None));
        };

        let applicant = self.applicants.mark_verified(applicant_id).await?;

        if let Err(err) = self.notifications.enqueue_admin_notification(&applicant).await {
            tracing::warn!("Failed to enqueue admin notification: {}", err);
        }

        Ok(VerificationOutcome::Success(Some(Box::new(applicant))))
    }

    async fn already_verified(&self, applicant_id: Option<Uuid>) -> Result<VerificationOutcome> {
        let applicant = match applicant_id {
            Some(id) => self.applicants.get(id).await?.map(Box::new),
            None => None,
        };
        Ok(VerificationOutcome::AlreadyVerified(applicant))
    }
}
