use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{applicant::Applicant, document::ApplicantDocument};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantDetailResponse {
    pub applicant: Applicant,
    pub documents: Vec<ApplicantDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[validate(length(max = 10000, message = "Notes are too long"))]
    pub notes: Option<String>,
}
