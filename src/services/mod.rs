//! Business logic services

pub mod catalog;
pub mod link_check;
pub mod lyrics;
pub mod music_info;

pub use catalog::CatalogService;
