//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **credentials**: Argon2id password hashing
//!
//! Adapters convert between domain types and infrastructure-specific
//! representations. They contain no business logic.

pub mod credentials;
pub mod persistence;
