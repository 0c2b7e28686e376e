//! Domain layer for the Early Bird backend.
//!
//! This crate contains:
//! - Domain models (registration record, request/response types)
//! - The social-proof simulation services

pub mod models;
pub mod services;
