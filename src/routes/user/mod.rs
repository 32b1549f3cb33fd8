pub mod user;
pub mod validate_user;
