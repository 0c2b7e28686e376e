//! Shared utilities for the Early Bird backend.
//!
//! This crate provides common functionality used across the other crates:
//! - Input validation (email format, name presence)
//! - Referral-code generation

pub mod referral;
pub mod validation;
