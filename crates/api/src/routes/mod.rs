//! HTTP route handlers.

pub mod health;
pub mod referrals;
pub mod registrations;
