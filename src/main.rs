mod collectors;
mod config;
mod payload;
mod readings;
mod reporter;

use clap::Parser;
use collectors::network::{collect_nics, describe_link_speed};
use collectors::system::SystemProbe;
use config::Config;
use payload::MetricRecord;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const REPORT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "metricd")]
#[command(version)]
struct Cli {
    #[arg(long, default_value = "./config.ini")]
    config: String,
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_ini());
        return;
    }

    let cfg = Config::load_or_init(&cli.config);
    info!(
        endpoint = %cfg.server_url,
        interval_secs = REPORT_INTERVAL.as_secs(),
        "starting metricd"
    );

    // The only fatal path: without the hardware handle no metric is
    // obtainable. Exits normally after the diagnostic so the operator
    // can re-run with elevated privileges.
    let probe = match SystemProbe::open() {
        Ok(probe) => probe,
        Err(err) => {
            error!(error = %err, "failed to acquire the hardware handle");
            return;
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let agent_task = tokio::spawn(run_cycles(cfg, probe, shutdown_rx));

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to wait for Ctrl+C");
    }
    info!("received shutdown signal, stopping cycles");

    let _ = shutdown_tx.send(true);
    let _ = agent_task.await;
}

/// The indefinite sampling-aggregation-reporting cycle. One cycle in
/// flight at a time; the fixed delay is additive to cycle cost, so the
/// true cadence is >= REPORT_INTERVAL.
async fn run_cycles(cfg: Config, mut probe: SystemProbe, mut shutdown: watch::Receiver<bool>) {
    let client = Client::builder()
        .user_agent(concat!("metricd/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new());

    loop {
        let snapshot = probe.snapshot();
        let machine_name = snapshot
            .host_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string());

        let record = MetricRecord::assemble(
            machine_name,
            readings::select_readings(&snapshot),
            describe_link_speed(&collect_nics()),
            chrono::Local::now(),
        );

        reporter::report(&client, &cfg.server_url, &record).await;

        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(REPORT_INTERVAL) => {}
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
