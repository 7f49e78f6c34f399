//! Favorite markers.

pub mod model;

pub use model::{Favorite, FavoriteState};
