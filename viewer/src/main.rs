use std::{convert::Infallible, sync::Arc, time::Duration};

use anyhow::Context;
use config::ViewerConfig;
use context::{ViewerContext, ViewerContextRef};
use geocoding::NominatimGeocoder;
use tokio::sync::RwLock;
use tracing::{error, info};
use warp::{reject::Rejection, Filter, Reply};

mod config;
mod context;
mod fetch;
mod geocoding;
mod handler;
mod list_view;
mod map_view;
mod resolution;
mod store;
mod ws;

#[cfg(test)]
mod test_support;

type Result<T> = std::result::Result<T, Rejection>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = tracing_subscriber::fmt::try_init();
    if let Err(e) = run(ViewerConfig::default()).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(config: ViewerConfig) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("failed to build http client")?;
    let geocoder = Arc::new(NominatimGeocoder::new(client.clone(), config.geocoder_url.clone()));
    let context_ref = Arc::new(RwLock::new(ViewerContext::new(&config.map, geocoder)));

    update_clients_periodically(context_ref.clone(), config.publish_interval);

    let (addr, server) = warp::serve(routes(context_ref.clone()))
        .try_bind_ephemeral(([0, 0, 0, 0], config.port))
        .with_context(|| format!("failed to bind to port {}", config.port))?;
    info!("starting vehicle viewer on http://{addr}");
    let server = tokio::spawn(server);

    fetch::load_vehicles(&context_ref, &client, &config.vehicles_url).await;

    server.await.context("http server stopped")?;
    Ok(())
}

fn routes(context_ref: ViewerContextRef) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api_routes = warp::path("api").and(
        warp::path("health").and_then(handler::health_handler)
            .or(warp::path("ws")
                .and(warp::ws())
                .and(with_context(context_ref))
                .and_then(handler::ws_handler))
    );

    let index_route = warp::path::end().and(warp::get()).and_then(handler::index_handler);

    index_route.or(api_routes)
}

/// Push a snapshot to every page whenever the view changed since the last tick.
fn update_clients_periodically(context_ref: ViewerContextRef, period: Duration) {
    let mut frontend_view_generation = 0;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let context = context_ref.read().await;
            if context.view_generation != frontend_view_generation {
                context.update_clients();
                frontend_view_generation = context.view_generation;
            }
        }
    });
}

fn with_context(context_ref: ViewerContextRef) -> impl Filter<Extract = (ViewerContextRef,), Error = Infallible> + Clone {
    warp::any().map(move || context_ref.clone())
}
