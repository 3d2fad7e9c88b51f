//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod decision_plan;
mod index_config;
mod intent;
mod storage_format;
mod storage_strategy;
mod type_path;

pub use decision_plan::*;
pub use index_config::*;
pub use intent::*;
pub use storage_format::*;
pub use storage_strategy::*;
pub use type_path::*;
