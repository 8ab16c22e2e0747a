//! Database repositories
//!
//! Repository pattern for database access, separating data access logic
//! from business logic.

pub mod groups;
pub mod library;
pub mod songs;
