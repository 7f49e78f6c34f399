//! Favorite toggling.

pub mod service;

pub use service::FavoriteService;
