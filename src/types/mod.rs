mod location;
mod models;

pub use location::{Location, LocationKind};
pub use models::*;
