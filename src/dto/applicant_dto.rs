use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitApplicationResponse {
    pub id: uuid::Uuid,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailParams {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    /// One of `success`, `already_verified`, `error`.
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<VerifiedApplicant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedApplicant {
    pub id: uuid::Uuid,
    pub full_name: String,
    pub email: String,
    pub email_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub email: String,
    pub newsletter_opt_in: bool,
    pub job_notifications_opt_in: bool,
    pub sms_notifications_opt_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub newsletter_opt_in: Option<bool>,
    pub job_notifications_opt_in: Option<bool>,
    pub sms_notifications_opt_in: Option<bool>,
}
