use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config::get_config;
use crate::error::Result;
use crate::models::applicant::Applicant;
use crate::models::notification_log::NotificationLog;

pub const EVENT_VERIFICATION_EMAIL: &str = "verification_email";
pub const EVENT_ADMIN_NEW_APPLICANT: &str = "admin_new_applicant";

const NOTIFICATION_COLUMNS: &str = "id, event_type, recipient, payload, status, attempts, \
     max_attempts, next_retry_at, created_at, updated_at";

/// Outbound email sends are fire-and-forget from the intake pipeline's
/// point of view: callers enqueue a row and move on. A background worker
/// drains the queue with retries; delivery failure is logged, never
/// surfaced to the applicant.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    client: Client,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            client: Client::new(),
        }
    }

    pub async fn enqueue(
        &self,
        event_type: &str,
        recipient: &str,
        payload: &JsonValue,
    ) -> Result<NotificationLog> {
        let row = sqlx::query_as::<_, NotificationLog>(&format!(
            "INSERT INTO notification_log (event_type, recipient, payload, status) \
             VALUES ($1, $2, $3, 'pending') \
             RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(event_type)
        .bind(recipient)
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Queues the "confirm your email" message for a fresh applicant.
    pub async fn enqueue_verification_email(
        &self,
        applicant: &Applicant,
        token: &str,
    ) -> Result<()> {
        let config = get_config();
        let payload = json!({
            "email": applicant.email,
            "name": applicant.full_name,
            "verificationToken": token,
            "verificationLink": format!("{}/verify-email?token={}", config.public_base_url, token),
        });
        self.enqueue(EVENT_VERIFICATION_EMAIL, &applicant.email, &payload)
            .await?;
        Ok(())
    }

    /// Queues the new-applicant alert for the review team.
    pub async fn enqueue_admin_notification(&self, applicant: &Applicant) -> Result<()> {
        let config = get_config();
        let payload = json!({
            "applicantId": applicant.id,
            "name": applicant.full_name,
            "email": applicant.email,
            "phone": applicant.phone,
            "positions": applicant.positions,
            "resumeUrl": applicant.resume_url,
            "submittedAt": applicant.created_at,
        });
        self.enqueue(EVENT_ADMIN_NEW_APPLICANT, &config.admin_email, &payload)
            .await?;
        Ok(())
    }

    async fn deliver_once(&self, id: Uuid) -> Result<()> {
        let log = sqlx::query_as::<_, NotificationLog>(&format!(
            "SELECT {} FROM notification_log WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let outcome = match &get_config().email_webhook_url {
            Some(url) => {
                let res = self
                    .client
                    .post(url)
                    .json(&json!({
                        "event": log.event_type,
                        "recipient": log.recipient,
                        "payload": log.payload,
                    }))
                    .send()
                    .await;
                match res {
                    Ok(resp) if resp.status().is_success() => Ok(()),
                    Ok(resp) => Err(format!("relay returned {}", resp.status())),
                    Err(err) => Err(err.to_string()),
                }
            }
            None => {
                // No relay configured: log the payload and count the
                // send as done. The sender is pluggable via
                // EMAIL_WEBHOOK_URL.
                tracing::info!(
                    event = %log.event_type,
                    recipient = %log.recipient,
                    payload = %log.payload,
                    "Outbound notification (no relay configured)"
                );
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {
                sqlx::query(
                    "UPDATE notification_log \
                     SET status = 'success', attempts = attempts + 1, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
            Err(reason) => {
                tracing::warn!(notification_id = %id, "Notification delivery failed: {}", reason);
                sqlx::query(
                    "UPDATE notification_log \
                     SET status = 'failed', attempts = attempts + 1, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    /// Picks one due pending row, attempts delivery, and schedules a
    /// retry with capped exponential backoff when it failed and attempts
    /// remain. Returns whether a row was processed.
    pub async fn run_once(&self) -> Result<bool> {
        let row_opt = sqlx::query(
            "SELECT id FROM notification_log \
             WHERE status = 'pending' AND (next_retry_at IS NULL OR next_retry_at <= NOW()) \
             ORDER BY created_at ASC \
             FOR UPDATE SKIP LOCKED \
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row_opt else { return Ok(false) };
        let id: Uuid = row.try_get("id")?;

        self.deliver_once(id).await?;

        let row2 = sqlx::query(
            "SELECT attempts, max_attempts, status FROM notification_log WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        let attempts: i32 = row2.try_get("attempts")?;
        let max_attempts: i32 = row2.try_get("max_attempts")?;
        let status: String = row2.try_get("status")?;

        if status == "failed" && attempts < max_attempts {
            sqlx::query(
                "UPDATE notification_log \
                 SET status = 'pending', \
                     next_retry_at = NOW() + make_interval(secs => \
                         LEAST(3600, 30 * power(2::float, GREATEST(0, attempts - 1))::int)) \
                 WHERE id = $1",
            )
            .bind(id)
            .execute(&self.pool)
            .await?;
        }

        Ok(true)
    }
}
