pub mod admin_routes;
pub mod applicant_routes;
pub mod health;
pub mod verification_routes;
