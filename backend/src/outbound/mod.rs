//! Outbound adapters implementing the domain repository ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store used when no database is configured
//!
//! Adapters translate between domain types and storage representations and
//! enforce the same uniqueness and ownership constraints; they hold no
//! business rules.

pub mod memory;
pub mod persistence;
