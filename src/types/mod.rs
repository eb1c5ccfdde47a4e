mod models;
mod opaque;

pub use models::*;
pub use opaque::OpaqueJson;
