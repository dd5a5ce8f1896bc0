mod annotate;
mod processor;

pub use annotate::{annotate_metric, CompiledRule};
pub use processor::ReverseDnsProcessor;
