pub mod collector;
pub mod context;
pub mod events;
pub mod orchestrator;
pub mod state;

pub use collector::FindingCollector;
pub use context::ScanContext;
pub use events::PassEvent;
pub use orchestrator::{CandidateOutcome, ClassificationOrchestrator};
pub use state::PassSummary;
