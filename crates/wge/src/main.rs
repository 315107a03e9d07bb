use std::sync::Arc;

use anyhow::Context;

use wge_bridge::{run_event_pump, BridgeClient};
use wge_core::{cache::ExtractionCache, config::Config, events::EventBus, extract::Extractor};
use wge_server::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wge_core::logging::init("wge");

    let cfg = Config::load().context("failed to load configuration")?;

    let client = BridgeClient::new(&cfg).context("failed to build bridge client")?;
    let cache = Arc::new(ExtractionCache::new());
    let extractor = Arc::new(Extractor::new(Arc::new(client.clone()), cache.clone()));
    let events = EventBus::default();

    // Lifecycle events (QR pairing, session state) flow from the bridge to
    // any connected SSE observers; the pump runs for the process lifetime.
    tokio::spawn(run_event_pump(client, events.clone()));

    let state = AppState::new(extractor, cache, events, cfg.resolve_timeout);
    let app = build_app(state);

    tracing::info!(addr = %cfg.bind_addr, "starting server");
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("server exited with error")?;

    Ok(())
}
