//! Share entities: a grant of access from an owner to another user.

pub mod capability;
pub mod model;

pub use capability::ShareCapabilities;
pub use model::{NewShare, Share};
