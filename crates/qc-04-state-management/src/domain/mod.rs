//! Domain layer - snapshot value type and its errors.

pub mod errors;
pub mod snapshot;

pub use errors::*;
pub use snapshot::*;
