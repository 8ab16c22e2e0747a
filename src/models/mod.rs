//! Shared API types

pub mod song;
