//! Batch entrypoint: runs one full scoring and fusion cycle.
//!
//! Triggered out of band (after each training run); safe to re-run at any
//! time since every write fully replaces the previous cycle's value.

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use recommender_api::{
    clients::HttpCatalogClient,
    config::Config,
    model::CfModel,
    services::RecommendationBuilder,
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

    let model_dir = Path::new(&config.model_dir);
    let item_model = load_model(&model_dir.join("item_based_model.json"), "item");
    let user_model = load_model(&model_dir.join("user_based_model.json"), "user");

    let builder = RecommendationBuilder::new(store, catalog, item_model, user_model);
    let summary = builder.run().await?;

    tracing::info!(
        organizations = summary.organizations,
        ranked = summary.ranked,
        skipped = summary.skipped,
        "Batch cycle finished"
    );

    Ok(())
}

/// A model that fails to load degrades the cycle to semantic-only ranking
/// rather than aborting it.
fn load_model(path: &Path, variant: &str) -> Option<CfModel> {
    match CfModel::load(path) {
        Ok(model) => Some(model),
        Err(e) => {
            tracing::warn!(variant, error = %e, "Collaborative model unavailable for this cycle");
            None
        }
    }
}
