pub mod candidate;
pub mod finding;
pub mod verdict;

pub use candidate::*;
pub use finding::*;
pub use verdict::*;
