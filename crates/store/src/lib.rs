//! Persistence layer for the Early Bird backend.
//!
//! This crate contains:
//! - The generic key-value store abstraction ([`kv::KvStore`])
//! - An in-memory backend for tests and development
//! - A PostgreSQL backend (single `kv_store` table)
//! - The typed registration repository built on top of the abstraction

pub mod kv;
pub mod memory;
pub mod metrics;
pub mod postgres;
pub mod registrations;

pub use kv::{KvStore, StoreError, VersionedValue};
pub use memory::MemoryKvStore;
pub use postgres::PgKvStore;
pub use registrations::RegistrationStore;
