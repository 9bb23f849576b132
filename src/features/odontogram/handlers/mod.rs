pub mod odontogram_handler;

pub use odontogram_handler::*;
