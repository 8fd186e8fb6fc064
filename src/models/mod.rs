pub mod applicant;
pub mod document;
pub mod notification_log;
pub mod verification_log;
