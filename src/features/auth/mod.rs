//! Caller credentials.
//!
//! The gateway does not authenticate users itself: it captures the bearer
//! token sent by the mobile client and forwards it to the upstream case API.

pub mod model;

pub use model::Credential;
