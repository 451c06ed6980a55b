pub mod cli;
pub mod config;
pub mod corpus;
pub mod detection;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod probe;
pub mod reporting;
pub mod utils;
