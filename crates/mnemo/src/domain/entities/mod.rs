//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - MemoryRecord: a stored piece of conversational memory
//! - MemoryEvent: lifecycle notification for memory operations

mod event;
mod memory;

pub use event::*;
pub use memory::*;
