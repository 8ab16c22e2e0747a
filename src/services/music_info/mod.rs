//! External music info provider integration.
//!
//! The provider enriches a bare (group, song) pair with its release date,
//! lyrics and a reference link.

pub mod client;
pub mod types;

pub use client::{MusicInfoClient, MusicInfoError};
