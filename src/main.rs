use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use recommender_api::{
    api::{create_router, AppState},
    clients::{HttpAuthClient, HttpCatalogClient},
    config::Config,
    model::CfModel,
    models::OrganizationId,
    store::{create_redis_client, ScoreStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let redis_client = create_redis_client(&config.redis_url)?;
    let store = ScoreStore::new(redis_client);

    let catalog = Arc::new(HttpCatalogClient::new(config.catalog_api_url.clone()));
    let auth = Arc::new(HttpAuthClient::new(config.auth_api_url.clone()));

    // The item model backs the similar-datasets lookup; the server runs
    // without it, the lookup just answers 404.
    let item_model_path = Path::new(&config.model_dir).join("item_based_model.json");
    let item_model = match CfModel::load(&item_model_path) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            tracing::warn!(error = %e, "Item model unavailable, similarity lookups disabled");
            None
        }
    };

    let state = AppState {
        store,
        catalog,
        auth,
        item_model,
        fallback_org_id: OrganizationId::from(config.fallback_org_id.as_str()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Recommender API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
