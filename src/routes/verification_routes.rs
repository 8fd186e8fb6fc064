use axum::{
    extract::{Query, State},
    Json,
};

use crate::dto::applicant_dto::{VerifiedApplicant, VerifyEmailParams, VerifyEmailResponse};
use crate::error::Result;
use crate::services::verification_service::VerificationOutcome;
use crate::AppState;

/// Consumes the token from the emailed `/verify-email?token=...` link.
/// A missing token short-circuits to the error state without touching
/// the store.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<Json<VerifyEmailResponse>> {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return Ok(Json(error_response("Missing verification token")));
    };

    let outcome = state.verification_service.verify_token(&token).await?;

    let response = match outcome {
        VerificationOutcome::Success(applicant) => VerifyEmailResponse {
            state: "success".to_string(),
            applicant: applicant.map(|a| VerifiedApplicant {
                id: a.id,
                full_name: a.full_name.clone(),
                email: a.email.clone(),
                email_verified: a.email_verified,
            }),
            message: None,
        },
        VerificationOutcome::AlreadyVerified(applicant) => VerifyEmailResponse {
            state: "already_verified".to_string(),
            applicant: applicant.map(|a| VerifiedApplicant {
                id: a.id,
                full_name: a.full_name.clone(),
                email: a.email.clone(),
                email_verified: a.email_verified,
            }),
            message: None,
        },
        VerificationOutcome::UnknownToken => {
            error_response("Verification link is invalid. Please contact support.")
        }
    };

    Ok(Json(response))
}

fn error_response(message: &str) -> VerifyEmailResponse {
    VerifyEmailResponse {
        state: "error".to_string(),
        applicant: None,
        message: Some(message.to_string()),
    }
}
