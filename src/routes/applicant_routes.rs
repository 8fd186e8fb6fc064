use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;

use crate::dto::applicant_dto::{
    PreferencesResponse, SubmitApplicationResponse, UpdatePreferencesRequest,
};
use crate::error::{Error, Result};
use crate::services::submission_service::{SubmissionForm, SupplementaryUpload, UploadedFile};
use crate::AppState;

/// Intake endpoint: multipart form with the applicant's text fields, a
/// required `resume` file, and zero-or-more `document` files each
/// preceded by a `document_type` text field.
pub async fn submit_application(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitApplicationResponse>)> {
    let form = parse_submission(multipart).await?;

    tracing::info!(email = %form.email, "Application submission received");

    let applicant = state.submission_service.submit(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitApplicationResponse {
            id: applicant.id,
            status: applicant.status,
            message: "Application received. Please check your email to verify your address."
                .to_string(),
        }),
    ))
}

async fn parse_submission(mut multipart: Multipart) -> Result<SubmissionForm> {
    let mut form = SubmissionForm::default();
    let mut pending_document_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "full_name" => form.full_name = field.text().await?,
            "email" => form.email = field.text().await?,
            "email_confirmed" => form.email_confirmed = field.text().await?,
            "phone" => form.phone = field.text().await?,
            "position" => form.positions.push(field.text().await?),
            "experience_years" => form.experience_years = non_empty(field.text().await?),
            "cover_letter" => form.cover_letter = non_empty(field.text().await?),
            "job_posting_url" => form.job_posting_url = non_empty(field.text().await?),
            "linkedin_url" => form.linkedin_url = non_empty(field.text().await?),
            "portfolio_url" => form.portfolio_url = non_empty(field.text().await?),
            "newsletter_opt_in" => form.newsletter_opt_in = parse_bool(&field.text().await?),
            "job_notifications_opt_in" => {
                form.job_notifications_opt_in = parse_bool(&field.text().await?);
            }
            "sms_notifications_opt_in" => {
                form.sms_notifications_opt_in = parse_bool(&field.text().await?);
            }
            "utm_source" => form.utm_source = non_empty(field.text().await?),
            "utm_medium" => form.utm_medium = non_empty(field.text().await?),
            "utm_campaign" => form.utm_campaign = non_empty(field.text().await?),
            "referrer" => form.referrer = non_empty(field.text().await?),
            "landing_page" => form.landing_page = non_empty(field.text().await?),
            "submission_language" => form.submission_language = non_empty(field.text().await?),
            "browser_language" => form.browser_language = non_empty(field.text().await?),
            "resume" => {
                form.resume = Some(read_file_field(field).await?);
            }
            "document_type" => pending_document_type = non_empty(field.text().await?),
            "document" => {
                let file = read_file_field(field).await?;
                form.documents.push(SupplementaryUpload {
                    document_type: pending_document_type
                        .take()
                        .unwrap_or_else(|| "other".to_string()),
                    file,
                });
            }
            other => {
                tracing::debug!("Ignoring unknown form field: {}", other);
            }
        }
    }

    Ok(form)
}

async fn read_file_field(field: axum::extract::multipart::Field<'_>) -> Result<UploadedFile> {
    let filename = field.file_name().unwrap_or("upload.bin").to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data: Bytes = field.bytes().await.map_err(|e| {
        tracing::error!("Failed to read file upload: {}", e);
        Error::BadRequest("Failed to read file upload".to_string())
    })?;
    Ok(UploadedFile {
        filename,
        mime_type,
        data,
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "true" | "1" | "on" | "yes")
}

pub async fn get_preferences(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<PreferencesResponse>> {
    let prefs = state
        .applicant_service
        .preferences_by_email(&email)
        .await?
        .ok_or_else(|| Error::NotFound("No application found for this email".to_string()))?;

    Ok(Json(PreferencesResponse {
        email,
        newsletter_opt_in: prefs.newsletter_opt_in,
        job_notifications_opt_in: prefs.job_notifications_opt_in,
        sms_notifications_opt_in: prefs.sms_notifications_opt_in,
    }))
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(body): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>> {
    let prefs = state
        .applicant_service
        .update_preferences(
            &email,
            body.newsletter_opt_in,
            body.job_notifications_opt_in,
            body.sms_notifications_opt_in,
        )
        .await?;

    Ok(Json(PreferencesResponse {
        email,
        newsletter_opt_in: prefs.newsletter_opt_in,
        job_notifications_opt_in: prefs.job_notifications_opt_in,
        sms_notifications_opt_in: prefs.sms_notifications_opt_in,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_fields_accept_common_truthy_spellings() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool(" on "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}
