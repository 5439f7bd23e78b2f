use std::sync::Arc;

use invtimer::{
    init_logging, log_app_start, log_source_configured, logging_config_from_env, HttpStatusSource,
    HttpStatusSourceConfig, LogDisplay, LogNotifier, PollerConfig, TimerPoller,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_cfg = logging_config_from_env();
    init_logging(&logging_cfg)?;
    log_app_start(&logging_cfg);

    let source_cfg = HttpStatusSourceConfig {
        base_url: std::env::var("INVTIMER_STATUS_BASE_URL")
            .unwrap_or_else(|_| HttpStatusSourceConfig::default().base_url),
        request_timeout_ms: env_u64("INVTIMER_REQUEST_TIMEOUT_MS", 3_000),
    };
    log_source_configured(&source_cfg.base_url, source_cfg.request_timeout_ms);

    let poller_cfg = PollerConfig {
        tick_interval_ms: env_u64("INVTIMER_TICK_MS", 1_000),
        ..PollerConfig::default()
    };

    let source = Arc::new(HttpStatusSource::new(&source_cfg)?);
    let poller = TimerPoller::new(
        poller_cfg,
        source,
        Arc::new(LogDisplay),
        Arc::new(LogNotifier),
    );

    for id in std::env::var("INVTIMER_IDS").unwrap_or_default().split(',') {
        let id = id.trim();
        if !id.is_empty() {
            poller.register(id);
        }
    }

    poller.start();
    tokio::signal::ctrl_c().await?;
    poller.clear_all();

    Ok(())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
