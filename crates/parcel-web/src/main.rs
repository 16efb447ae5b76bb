//! Parcel Browser Web Server
//!
//! Serves the static site (HTML, client scripts, the parcels dataset)
//! and the filter API. All filter state lives here; the client renders
//! from snapshots and posts checkbox changes back.

mod routes;
mod state;

use axum::Router;
use http::header::{HeaderValue, CACHE_CONTROL};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parcel_browser::{dataset, FilterSet, RulesLoader};

use crate::routes::{api, static_files};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcel_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Parcel Browser server");

    let data_path =
        std::env::var("PARCEL_DATA").unwrap_or_else(|_| "data/parcels.csv".to_string());
    let site_dir = std::env::var("PARCEL_SITE_DIR").unwrap_or_else(|_| "site".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    // Grouping rules + dataset. The server is useless without either,
    // so both are startup failures.
    let config = RulesLoader::from_env().load()?;
    let parcels = dataset::load_parcels(&data_path)?;
    tracing::info!(parcels = parcels.len(), "dataset ready");

    let filters = FilterSet::build(&parcels, &config);

    // Fire-and-forget change consumer: one log line per toggle.
    let changes = filters.changes();
    std::thread::spawn(move || {
        for change in changes.iter() {
            tracing::debug!(?change, "filter change observed");
        }
    });

    let app_state = AppState::new(parcels, filters);

    let app = Router::new()
        .merge(api::router(app_state))
        .merge(static_files::site_router(&site_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Embedding iframes cache stale assets; every response
                // opts out.
                .layer(SetResponseHeaderLayer::overriding(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate"),
                ))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Parcel browser listening at http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
