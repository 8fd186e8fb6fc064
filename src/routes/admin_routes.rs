use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{ApplicantDetailResponse, UpdateStatusRequest};
use crate::error::{Error, FieldError, Result};
use crate::models::applicant::{Applicant, ApplicantStatus};
use crate::AppState;

pub async fn list_applicants(State(state): State<AppState>) -> Result<Json<Vec<Applicant>>> {
    let applicants = state.applicant_service.list().await?;
    Ok(Json(applicants))
}

pub async fn get_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicantDetailResponse>> {
    let applicant = state
        .applicant_service
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound("Applicant not found".to_string()))?;
    let documents = state.document_service.list_for_applicant(id).await?;

    Ok(Json(ApplicantDetailResponse {
        applicant,
        documents,
    }))
}

/// Review-state updates come only through here; the intake pipeline
/// itself never writes anything but `new`.
pub async fn update_applicant_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Applicant>> {
    body.validate()
        .map_err(|e| Error::BadRequest(e.to_string()))?;

    let status = ApplicantStatus::parse(&body.status).ok_or_else(|| {
        Error::Validation(vec![FieldError::new(
            "status",
            format!("Unknown status: {}", body.status),
        )])
    })?;

    let applicant = state
        .applicant_service
        .update_status(id, status, body.notes)
        .await?;
    Ok(Json(applicant))
}
