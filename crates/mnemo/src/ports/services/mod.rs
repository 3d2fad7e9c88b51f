//! Service Ports
//!
//! Abstract interfaces for the model collaborator.

mod completion;
mod embedding;

pub use completion::*;
pub use embedding::*;
