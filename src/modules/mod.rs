//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client for the upstream forensic case API.

pub mod case_api;
