pub mod formatter;
pub mod run_log;
pub mod sink;
pub mod writer;

pub use formatter::{format_summary, format_verdict_line};
pub use run_log::RunLog;
pub use sink::{FileVerdictSink, MemorySink, VerdictSink};
pub use writer::{atomic_write, write_findings_json};
