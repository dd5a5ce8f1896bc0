use clap::Parser;
use metric_rdns_domain::CliOverrides;
use metric_rdns_jobs::JobRunner;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;
mod di;
mod io;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "metric-rdns")]
#[command(version = "0.1.0")]
#[command(about = "Annotates JSON metrics with reverse DNS hostnames")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting metric-rdns v{}", env!("CARGO_PKG_VERSION"));

    let mut services = di::ReverseDnsServices::new(&config)?;

    let shutdown = CancellationToken::new();
    JobRunner::new()
        .with_cache_cleanup(services.cleanup_job())
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    services.processor.start(Arc::new(io::StdoutSink::new()));

    let lines = io::spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;
    let read = io::read_metrics(lines, &services.processor);
    tokio::select! {
        result = read => {
            let summary = result?;
            info!(
                accepted = summary.accepted,
                rejected = summary.rejected,
                "Input closed"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, draining pending metrics");
        }
    }

    services.processor.stop().await;
    shutdown.cancel();

    let stats = services.cache.stats();
    info!(
        cache_hit = stats.cache_hit,
        cache_miss = stats.cache_miss,
        cache_expire = stats.cache_expire,
        cache_size = stats.size,
        "Shutdown complete"
    );

    Ok(())
}
