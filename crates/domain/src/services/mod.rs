//! Domain services.

pub mod social_proof;
