pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    applicant_service::ApplicantService, document_service::DocumentService,
    notification_service::NotificationService, submission_service::SubmissionService,
    upload_service::UploadService, verification_service::VerificationService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub applicant_service: ApplicantService,
    pub document_service: DocumentService,
    pub upload_service: UploadService,
    pub notification_service: NotificationService,
    pub verification_service: VerificationService,
    pub submission_service: SubmissionService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let applicant_service = ApplicantService::new(pool.clone());
        let document_service = DocumentService::new(pool.clone());
        let upload_service =
            UploadService::new(config.uploads_dir.clone(), config.public_base_url.clone());
        let notification_service = NotificationService::new(pool.clone());
        let verification_service = VerificationService::new(
            pool.clone(),
            applicant_service.clone(),
            notification_service.clone(),
        );
        let submission_service = SubmissionService::new(
            applicant_service.clone(),
            document_service.clone(),
            verification_service.clone(),
            upload_service.clone(),
            notification_service.clone(),
        );

        Self {
            pool,
            applicant_service,
            document_service,
            upload_service,
            notification_service,
            verification_service,
            submission_service,
        }
    }
}
