pub mod events;
pub mod index_maintenance;
pub mod planner;

pub use events::EventEmitter;
pub use index_maintenance::IndexMaintenanceService;
pub use planner::{DecisionPlanner, TurnOutcome, TurnPhase, TurnRequest, Understanding};
