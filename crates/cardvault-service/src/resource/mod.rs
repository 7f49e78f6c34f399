//! Resource lifecycle.

pub mod service;

pub use service::ResourceService;
