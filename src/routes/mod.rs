//! HTTP route handlers

pub mod health;
pub mod library;
pub mod songs;
