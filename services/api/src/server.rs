use crate::cli::ServeArgs;
use crate::infra::{seed_demo_catalog, spawn_live_relay, AppState, BroadcastLiveChannel};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_hub::config::AppConfig;
use estate_hub::error::AppError;
use estate_hub::marketplace::Marketplace;
use estate_hub::telemetry;
use estate_hub::workflows::memory::InMemoryStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let live = BroadcastLiveChannel::new(config.marketplace.live_channel_capacity);
    let _relay = spawn_live_relay(&live);
    let store = InMemoryStore::new();
    let market = Marketplace::in_memory(&store, Arc::new(live));

    if config.marketplace.seed_demo {
        let seeded = seed_demo_catalog(&market)?;
        info!(listings = seeded.len(), "demo catalog seeded");
    }

    let app = with_marketplace_routes(&market)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "estate hub marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
