use std::{net::SocketAddr, sync::Arc};
use streak_tracker::{
    AppState, Config,
    clock::{Clock, ManualClock, SystemClock},
    load_store,
    notify::{self, LogNotifier, NotifierHandle},
    router,
};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let store = load_store(&config.data_path).await;

    let clock: Arc<dyn Clock> = match config.fake_today {
        Some(day) => {
            warn!(%day, "clock pinned by STREAK_FAKE_TODAY");
            Arc::new(ManualClock::new(day))
        }
        None => Arc::new(SystemClock),
    };

    let notifier = if config.notifications {
        let (slot, handle) = notify::channel(config.notify_wait);
        slot.ready(Arc::new(LogNotifier));
        handle
    } else {
        info!("notifications disabled");
        NotifierHandle::unavailable()
    };

    let state = AppState::new(
        config.data_path.clone(),
        store,
        clock,
        config.milestones.clone(),
        notifier,
    );
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
