use metric_rdns_application::use_cases::ReverseDnsProcessor;
use metric_rdns_domain::Metric;
use std::io::{self, BufRead};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const LINE_BUFFER: usize = 1024;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    pub accepted: u64,
    pub rejected: u64,
}

/// Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Metric>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Reads `input` line by line on a dedicated thread. The thread is not part
/// of the runtime's blocking pool, so shutting the runtime down never waits
/// on a read that has no data yet.
pub fn spawn_line_reader<R>(input: R) -> io::Result<mpsc::Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    std::thread::Builder::new()
        .name("metric-rdns-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
            debug!("Input reader finished");
        })?;

    Ok(rx)
}

/// Feeds one JSON metric per line into the processor until the input ends.
/// Lines that do not parse are logged and dropped.
pub async fn read_metrics(
    mut lines: mpsc::Receiver<String>,
    processor: &ReverseDnsProcessor,
) -> anyhow::Result<ReadSummary> {
    let mut summary = ReadSummary::default();
    let mut line_no = 0u64;

    while let Some(line) = lines.recv().await {
        line_no += 1;
        match parse_line(&line) {
            Ok(Some(metric)) => {
                processor.add(metric).await?;
                summary.accepted += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed metric");
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}
