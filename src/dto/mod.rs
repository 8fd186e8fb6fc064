pub mod admin_dto;
pub mod applicant_dto;
