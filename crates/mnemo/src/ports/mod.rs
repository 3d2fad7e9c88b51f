//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the memory core interacts with
//! its external collaborators (database service, model service).
//!
//! Implementations of these traits live outside this crate.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
