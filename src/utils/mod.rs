pub mod phone;
pub mod token;
pub mod validation;
