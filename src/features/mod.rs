pub mod auth;
pub mod odontogram;
pub mod reports;
