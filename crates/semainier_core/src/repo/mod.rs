//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it.
//! - Ordering mutations run inside one immediate transaction per container.

pub mod activity_repo;
pub mod container_repo;
pub mod goal_repo;
pub mod settings_repo;
