pub mod applicant_service;
pub mod document_service;
pub mod notification_service;
pub mod submission_service;
pub mod upload_service;
pub mod verification_service;
