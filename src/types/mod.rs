mod identity;
mod models;

pub use identity::CallerIdentity;
pub use models::*;
