/// Main entry point for the roulette tracker
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use roulette_tracker::{
    config::load_config_or_default,
    data::{SharedHistory, SnapshotFile},
    error::Result,
    feed::BlazeClient,
    ingest::IngestionScheduler,
    server::{self, AppState},
    time::CivilZone,
    Config, LogFormat,
};

/// Application state
pub struct TrackerApp {
    config: Arc<Config>,
    history: SharedHistory,
    zone: CivilZone,
    scheduler: Arc<IngestionScheduler<BlazeClient>>,
    shutdown: watch::Sender<bool>,
}

impl TrackerApp {
    pub async fn new(config_path: &str) -> Result<Self> {
        let config_found = Path::new(config_path).exists();
        let config = Arc::new(load_config_or_default(config_path)?);

        // Initialize logging
        init_logging(&config);

        info!("Starting roulette tracker...");
        if config_found {
            info!("Configuration loaded from {}", config_path);
        } else {
            info!("No config file at {}, using defaults", config_path);
        }

        let zone = CivilZone::from_config(config.utc_offset_minutes, config.iana_zone.as_deref())?;
        info!("Civil zone: {:?}", zone);

        // Rehydrate history from the last snapshot
        let snapshot = SnapshotFile::new(&config.history_path);
        info!("History snapshot: {}", snapshot.path().display());
        let history = SharedHistory::new(snapshot.load_history().await);

        let feed = BlazeClient::new(
            config.feed_url.clone(),
            Duration::from_secs(config.request_timeout_sec),
        )?;
        info!("Result feed: {}", feed.url());

        let scheduler = Arc::new(IngestionScheduler::new(
            feed,
            history.clone(),
            snapshot,
            zone,
            config.retention_days,
            Duration::from_secs(config.poll_interval_sec),
        ));

        let (shutdown, _) = watch::channel(false);

        Ok(TrackerApp {
            config,
            history,
            zone,
            scheduler,
            shutdown,
        })
    }

    /// Run the ingestion loop and the read API until Ctrl+C
    pub async fn run(&self) -> Result<()> {
        self.setup_shutdown_handler();

        let scheduler_task = tokio::spawn(
            Arc::clone(&self.scheduler).run(self.shutdown.subscribe()),
        );

        let state = AppState {
            history: self.history.clone(),
            zone: self.zone,
            results_limit: self.config.results_limit,
        };

        let served = server::serve(state, self.config.http_port, self.shutdown.subscribe()).await;

        // Stop the scheduler even if the server failed
        let _ = self.shutdown.send(true);
        if let Err(e) = scheduler_task.await {
            error!("Scheduler task ended abnormally: {}", e);
        }

        served?;
        info!(
            "Shutdown complete, {} results in history",
            self.history.len().await
        );
        Ok(())
    }

    /// Setup graceful shutdown handler
    fn setup_shutdown_handler(&self) {
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }

            info!("Ctrl+C received - initiating graceful shutdown");
            let _ = shutdown.send(true);
        });
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config.toml".to_string());

    let app = TrackerApp::new(&config_path).await?;

    app.run().await?;

    Ok(())
}
