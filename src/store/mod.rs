use std::collections::HashMap;
use std::fmt::Display;

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};
use crate::models::{DatasetId, DatasetMetadata, OrganizationId, RankingSnapshot, ScoreList};

/// Keys under which scoring artifacts live in the store.
///
/// One key per artifact per organization; batch writes fully replace the
/// previous cycle's value at that key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoreKey {
    SemanticScores(OrganizationId),
    ItemScores(OrganizationId),
    UserScores(OrganizationId),
    Sparsity,
    Ranking(OrganizationId),
    DatasetInfo,
    InteractionCount,
}

impl Display for ScoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreKey::SemanticScores(org) => write!(f, "scores:semantic:{}", org),
            ScoreKey::ItemScores(org) => write!(f, "scores:item:{}", org),
            ScoreKey::UserScores(org) => write!(f, "scores:user:{}", org),
            ScoreKey::Sparsity => write!(f, "scores:sparsity"),
            ScoreKey::Ranking(org) => write!(f, "recommendations:{}", org),
            ScoreKey::DatasetInfo => write!(f, "datasets:info"),
            ScoreKey::InteractionCount => write!(f, "interactions:count"),
        }
    }
}

/// Creates a Redis client for the score store
///
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Durable store for score lists, sparsity, rankings and dataset metadata.
///
/// Values are JSON-serialized. The batch builder is the only writer of
/// rankings; the serving path only reads.
#[derive(Clone)]
pub struct ScoreStore {
    redis_client: Client,
}

impl ScoreStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    /// Retrieves and deserializes the value at a key, `None` when absent
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &ScoreKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(key.to_string()).await?;

        match stored {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Store deserialization error: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serializes and writes the value at a key, replacing any prior value
    async fn set_json<T: serde::Serialize>(&self, key: &ScoreKey, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Store serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key.to_string(), json).await.map_err(|e| {
            tracing::warn!(key = %key, error = %e, "Store write failed");
            e
        })?;

        Ok(())
    }

    pub async fn get_score_list(&self, key: &ScoreKey) -> AppResult<Option<ScoreList>> {
        self.get_json(key).await
    }

    pub async fn set_score_list(&self, key: &ScoreKey, scores: &ScoreList) -> AppResult<()> {
        self.set_json(key, scores).await
    }

    pub async fn get_sparsity(&self) -> AppResult<Option<f64>> {
        self.get_json(&ScoreKey::Sparsity).await
    }

    pub async fn set_sparsity(&self, sparsity: f64) -> AppResult<()> {
        self.set_json(&ScoreKey::Sparsity, &sparsity).await
    }

    pub async fn get_ranking(&self, org_id: &OrganizationId) -> AppResult<Option<RankingSnapshot>> {
        self.get_json(&ScoreKey::Ranking(org_id.clone())).await
    }

    pub async fn set_ranking(
        &self,
        org_id: &OrganizationId,
        snapshot: &RankingSnapshot,
    ) -> AppResult<()> {
        self.set_json(&ScoreKey::Ranking(org_id.clone()), snapshot)
            .await
    }

    pub async fn get_dataset_info(
        &self,
    ) -> AppResult<Option<HashMap<DatasetId, DatasetMetadata>>> {
        self.get_json(&ScoreKey::DatasetInfo).await
    }

    pub async fn set_dataset_info(
        &self,
        info: &HashMap<DatasetId, DatasetMetadata>,
    ) -> AppResult<()> {
        self.set_json(&ScoreKey::DatasetInfo, info).await
    }

    /// Interaction count written by the out-of-band training job
    pub async fn get_interaction_count(&self) -> AppResult<Option<u64>> {
        self.get_json(&ScoreKey::InteractionCount).await
    }
}
