mod odontogram_service;

pub use odontogram_service::{OdontogramService, ToothEditOutcome};
