use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{DatasetId, OrganizationId};

/// A pre-trained collaborative-filtering model, loaded from the dump the
/// training job writes to disk.
///
/// The dump carries a global interaction mean, per-organization and
/// per-asset biases, latent factor vectors, and precomputed per-asset
/// neighbor lists. The model is read-only for the duration of a cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CfModel {
    pub global_mean: f64,
    #[serde(default)]
    org_biases: HashMap<OrganizationId, f64>,
    #[serde(default)]
    asset_biases: HashMap<DatasetId, f64>,
    #[serde(default)]
    org_factors: HashMap<OrganizationId, Vec<f64>>,
    #[serde(default)]
    asset_factors: HashMap<DatasetId, Vec<f64>>,
    #[serde(default)]
    neighbors: HashMap<DatasetId, Vec<DatasetId>>,
}

impl CfModel {
    /// Loads a model dump from disk.
    ///
    /// A load failure means the collaborative signal is unavailable for the
    /// current cycle; callers degrade to semantic-only ranking.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Internal(format!("While reading model dump {:?}: {}", path, e)))?;

        let model: CfModel = serde_json::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("Model dump {:?} is malformed: {}", path, e)))?;

        tracing::info!(
            path = %path.display(),
            org_entries = model.org_factors.len(),
            asset_entries = model.asset_factors.len(),
            neighbor_entries = model.neighbors.len(),
            "Collaborative model loaded"
        );

        Ok(model)
    }

    /// Predicted relevance of a data asset for an organization.
    ///
    /// Bias-plus-latent-factor estimate; unknown ids contribute nothing, so
    /// a fully unknown pair falls back to the global mean.
    pub fn predict(&self, org_id: &OrganizationId, dataset_id: &DatasetId) -> f64 {
        let org_bias = self.org_biases.get(org_id).copied().unwrap_or(0.0);
        let asset_bias = self.asset_biases.get(dataset_id).copied().unwrap_or(0.0);

        let interaction = match (self.org_factors.get(org_id), self.asset_factors.get(dataset_id)) {
            (Some(org), Some(asset)) if org.len() == asset.len() => {
                org.iter().zip(asset.iter()).map(|(a, b)| a * b).sum()
            }
            _ => 0.0,
        };

        self.global_mean + org_bias + asset_bias + interaction
    }

    /// Top-k most similar assets, `None` when the asset is unknown to the
    /// model
    pub fn neighbors(&self, dataset_id: &DatasetId, k: usize) -> Option<Vec<DatasetId>> {
        self.neighbors
            .get(dataset_id)
            .map(|ids| ids.iter().take(k).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> CfModel {
        serde_json::from_str(
            r#"{
                "global_mean": 2.0,
                "org_biases": {"1": 0.5},
                "asset_biases": {"10": -0.25},
                "org_factors": {"1": [1.0, 2.0]},
                "asset_factors": {"10": [0.5, 0.5]},
                "neighbors": {"10": ["11", "12", "13"]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_predict_known_pair() {
        let model = test_model();
        let score = model.predict(&OrganizationId::from("1"), &DatasetId::from("10"));
        // 2.0 + 0.5 - 0.25 + (1.0*0.5 + 2.0*0.5)
        assert!((score - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_predict_unknown_pair_falls_back_to_global_mean() {
        let model = test_model();
        let score = model.predict(&OrganizationId::from("99"), &DatasetId::from("99"));
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_unknown_asset_keeps_org_bias() {
        let model = test_model();
        let score = model.predict(&OrganizationId::from("1"), &DatasetId::from("99"));
        assert!((score - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_neighbors_respects_k() {
        let model = test_model();
        let neighbors = model.neighbors(&DatasetId::from("10"), 2).unwrap();
        assert_eq!(neighbors, vec![DatasetId::from("11"), DatasetId::from("12")]);
    }

    #[test]
    fn test_neighbors_unknown_asset() {
        let model = test_model();
        assert!(model.neighbors(&DatasetId::from("404"), 10).is_none());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = CfModel::load(Path::new("/nonexistent/model_dump.json"));
        assert!(result.is_err());
    }
}
