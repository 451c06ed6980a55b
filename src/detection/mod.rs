pub mod decoder;
pub mod domain;
pub mod heuristic;
pub mod filter;

pub use decoder::decode;
pub use domain::is_internal;
pub use heuristic::RedirectHeuristic;
pub use filter::{CandidateFilter, filter_candidates};
