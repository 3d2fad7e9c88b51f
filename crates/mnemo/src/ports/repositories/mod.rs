//! Repository Ports
//!
//! Abstract interfaces for data access.

mod memory_repository;

pub use memory_repository::*;
