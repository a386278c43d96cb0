use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    clients::CatalogClient,
    error::AppResult,
    model::CfModel,
    models::{DatasetId, DatasetMetadata, OrganizationId, RankingSnapshot, ScoreList},
    scoring::{self, SemanticScorer},
    store::{ScoreKey, ScoreStore},
};

/// Outcome of one batch cycle
#[derive(Debug, Default, PartialEq)]
pub struct CycleSummary {
    pub organizations: usize,
    pub ranked: usize,
    pub skipped: usize,
}

/// Drives one full scoring and fusion cycle.
///
/// For every known organization: compute the three score lists, fuse them
/// with the cycle's sparsity weight, and persist the resulting ranking,
/// fully replacing the previous cycle's output. A failure for one
/// organization is logged and skips that organization only — its prior
/// ranking stays readable until the next successful cycle.
pub struct RecommendationBuilder {
    store: ScoreStore,
    catalog: Arc<dyn CatalogClient>,
    item_model: Option<CfModel>,
    user_model: Option<CfModel>,
}

impl RecommendationBuilder {
    pub fn new(
        store: ScoreStore,
        catalog: Arc<dyn CatalogClient>,
        item_model: Option<CfModel>,
        user_model: Option<CfModel>,
    ) -> Self {
        Self {
            store,
            catalog,
            item_model,
            user_model,
        }
    }

    pub async fn run(&self) -> AppResult<CycleSummary> {
        tracing::info!("Trying to generate recommendations");

        let organizations = self.catalog.fetch_organizations().await?;
        if organizations.is_empty() {
            tracing::warn!("No organizations retrieved");
            return Ok(CycleSummary::default());
        }

        let assets = self.catalog.fetch_dataset_catalog().await?;
        let dataset_info: HashMap<DatasetId, DatasetMetadata> = assets
            .iter()
            .map(|asset| (asset.id.clone(), DatasetMetadata::from(asset)))
            .collect();
        self.store.set_dataset_info(&dataset_info).await?;

        let taxonomy = self.catalog.fetch_taxonomy().await?;
        let scorer = SemanticScorer::new(taxonomy, &assets);
        let datasets = scorer.dataset_ids();

        let sparsity = self.cycle_sparsity(datasets.len(), organizations.len()).await;
        self.store.set_sparsity(sparsity).await?;

        let item_scores = self.collaborative_matrix(
            self.item_model.as_ref(),
            &organizations,
            &datasets,
            "item",
        );
        let user_scores = self.collaborative_matrix(
            self.user_model.as_ref(),
            &organizations,
            &datasets,
            "user",
        );

        let mut summary = CycleSummary {
            organizations: organizations.len(),
            ..CycleSummary::default()
        };

        for org_id in &organizations {
            match self
                .rank_organization(org_id, &scorer, &item_scores, &user_scores, sparsity)
                .await
            {
                Ok(()) => summary.ranked += 1,
                Err(e) => {
                    tracing::error!(org_id = %org_id, error = %e, "Organization skipped for this cycle");
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            organizations = summary.organizations,
            ranked = summary.ranked,
            skipped = summary.skipped,
            "Recommendations successfully generated"
        );

        Ok(summary)
    }

    /// Sparsity for this cycle, falling back to `0` (pure semantic ranking)
    /// when the interaction count is unavailable, the catalog is degenerate,
    /// or a collaborative model failed to load.
    async fn cycle_sparsity(&self, item_count: usize, org_count: usize) -> f64 {
        if self.item_model.is_none() || self.user_model.is_none() {
            tracing::warn!("Collaborative model unavailable, forcing sparsity to 0");
            return 0.0;
        }

        let interaction_count = match self.store.get_interaction_count().await {
            Ok(Some(count)) => count,
            Ok(None) => {
                tracing::warn!("Interaction count missing from store, using sparsity 0");
                return 0.0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "While reading the interaction count, using sparsity 0");
                return 0.0;
            }
        };

        match scoring::estimate_sparsity(interaction_count, item_count, org_count) {
            Ok(sparsity) => sparsity,
            Err(e) => {
                tracing::warn!(error = %e, "Sparsity is degenerate, using 0");
                0.0
            }
        }
    }

    fn collaborative_matrix(
        &self,
        model: Option<&CfModel>,
        organizations: &[OrganizationId],
        datasets: &[DatasetId],
        variant: &str,
    ) -> Option<HashMap<OrganizationId, ScoreList>> {
        let model = model?;
        match scoring::score_catalog(model, organizations, datasets) {
            Ok(scores) => {
                tracing::info!(variant, organizations = scores.len(), "Scoring matrix created");
                Some(scores)
            }
            Err(e) => {
                tracing::warn!(variant, error = %e, "Collaborative scoring unavailable this cycle");
                None
            }
        }
    }

    async fn rank_organization(
        &self,
        org_id: &OrganizationId,
        scorer: &SemanticScorer,
        item_scores: &Option<HashMap<OrganizationId, ScoreList>>,
        user_scores: &Option<HashMap<OrganizationId, ScoreList>>,
        sparsity: f64,
    ) -> AppResult<()> {
        let preferences = match self.catalog.fetch_preferences(org_id).await {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!(org_id = %org_id, error = %e, "Preference fetch failed, using empty set");
                Default::default()
            }
        };

        let semantic = scorer.score(&preferences);
        self.store
            .set_score_list(&ScoreKey::SemanticScores(org_id.clone()), &semantic)
            .await?;

        let entries = match (
            item_scores.as_ref().and_then(|m| m.get(org_id)),
            user_scores.as_ref().and_then(|m| m.get(org_id)),
        ) {
            (Some(item), Some(user)) => {
                self.store
                    .set_score_list(&ScoreKey::ItemScores(org_id.clone()), item)
                    .await?;
                self.store
                    .set_score_list(&ScoreKey::UserScores(org_id.clone()), user)
                    .await?;
                scoring::fuse(&semantic, item, user, sparsity)?
            }
            // No collaborative signal this cycle: the ranking is the semantic
            // list re-sorted into relevance order.
            _ => {
                let mut entries = semantic;
                entries.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                entries
            }
        };

        self.store
            .set_ranking(org_id, &RankingSnapshot::new(entries))
            .await?;

        Ok(())
    }
}
