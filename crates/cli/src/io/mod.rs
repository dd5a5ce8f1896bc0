mod stdin_source;
mod stdout_sink;

pub use stdin_source::{read_metrics, spawn_line_reader};
pub use stdout_sink::StdoutSink;
