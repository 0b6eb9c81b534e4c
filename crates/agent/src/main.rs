//! `toastd-agent` -- host event-threshold notifier daemon.
//!
//! Polls host state (battery level, network connectivity), evaluates the
//! observations against configured threshold rules, and raises transient
//! desktop notifications for qualifying events.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default       | Description                              |
//! |--------------------------|----------|---------------|------------------------------------------|
//! | `BATTERY_THRESHOLD`      | no       | `90`          | Battery percentage for the default rule  |
//! | `BATTERY_POLL_SECS`      | no       | `30`          | Seconds between battery reads            |
//! | `CONNECTIVITY_POLL_SECS` | no       | `5`           | Seconds between connectivity reads       |
//! | `NOTIFY_BACKEND`         | no       | `desktop`     | `desktop` (notify-send) or `log`         |
//! | `NOTIFY_SEND_BIN`        | no       | `notify-send` | Override the notifier binary             |
//! | `RULES_JSON`             | no       | --            | JSON rule array replacing the defaults   |

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toastd_agent::config::{AgentConfig, NotifyBackend};
use toastd_agent::probe::{BatteryProbe, ConnectivityProbe};
use toastd_events::{
    DesktopNotifier, EventBus, LogNotifier, NotificationSink, ReceiverRegistry,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "toastd_agent=info,toastd_events=info,toastd_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        rules = config.rules.len(),
        backend = %config.notify_backend,
        battery_poll_secs = config.battery_poll.as_secs(),
        connectivity_poll_secs = config.connectivity_poll.as_secs(),
        "Starting toastd-agent",
    );

    let bus = Arc::new(EventBus::default());

    let sink: Arc<dyn NotificationSink> = match config.notify_backend {
        NotifyBackend::Desktop => Arc::new(DesktopNotifier::with_binary(&config.notify_send_bin)),
        NotifyBackend::Log => Arc::new(LogNotifier::new()),
    };

    let mut registry = ReceiverRegistry::new(bus.clone(), config.rules.clone(), sink);
    registry.start();

    let shutdown = CancellationToken::new();
    let battery = tokio::spawn(
        BatteryProbe::new(config.battery_poll).run(bus.clone(), shutdown.clone()),
    );
    let connectivity = tokio::spawn(
        ConnectivityProbe::new(config.connectivity_poll).run(bus.clone(), shutdown.clone()),
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");

    shutdown.cancel();
    let _ = battery.await;
    let _ = connectivity.await;
    registry.stop();

    tracing::info!("toastd-agent stopped");
}
