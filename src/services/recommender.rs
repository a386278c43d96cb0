use std::collections::HashMap;

use crate::{
    clients::CatalogClient,
    error::AppResult,
    models::{DatasetId, DatasetMetadata, OrganizationId, RankingSnapshot},
    store::ScoreStore,
};

/// Upper bound on the served recommendation list
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Serves one organization's recommendations.
///
/// Reads the stored ranking, narrows it through the ownership, visibility
/// and deletion filters, hydrates metadata, and truncates to the top
/// [`MAX_RECOMMENDATIONS`]. Every filter is stable — relative relevance
/// order is never disturbed — and every filter fails open: a collaborator
/// outage leaves that step unapplied rather than failing the request.
pub async fn generate_recommendations(
    store: &ScoreStore,
    catalog: &dyn CatalogClient,
    fallback_org_id: &OrganizationId,
    org_id: &OrganizationId,
) -> AppResult<Vec<DatasetMetadata>> {
    tracing::info!(org_id = %org_id, "Generating recommendations");

    let snapshot = match lookup_ranking(store, fallback_org_id, org_id).await? {
        Some(snapshot) => snapshot,
        None => return Ok(Vec::new()),
    };

    let ids: Vec<DatasetId> = snapshot
        .entries
        .into_iter()
        .map(|entry| entry.dataset_id)
        .collect();

    let ids = filter_datasets(catalog, org_id, ids).await;

    let dataset_info = match store.get_dataset_info().await? {
        Some(info) => info,
        None => {
            tracing::warn!("Dataset information missing from store");
            HashMap::new()
        }
    };

    Ok(hydrate(ids, &dataset_info))
}

/// Ranking lookup with the explicit unknown-organization fallback policy:
/// an organization absent from the recommendation matrix is served the
/// configured fallback organization's ranking.
async fn lookup_ranking(
    store: &ScoreStore,
    fallback_org_id: &OrganizationId,
    org_id: &OrganizationId,
) -> AppResult<Option<RankingSnapshot>> {
    if let Some(snapshot) = store.get_ranking(org_id).await? {
        return Ok(Some(snapshot));
    }

    tracing::warn!(
        org_id = %org_id,
        fallback_org_id = %fallback_org_id,
        "Organization does not exist in the recommendation matrix, serving fallback"
    );

    let snapshot = store.get_ranking(fallback_org_id).await?;
    if snapshot.is_none() {
        tracing::warn!(
            fallback_org_id = %fallback_org_id,
            "Fallback organization has no ranking either"
        );
    }

    Ok(snapshot)
}

/// The ownership → visibility → deletion filter chain, in fixed order.
///
/// Each step retains the surviving ids in their original order. A failed
/// collaborator call skips that step (fail-open) and is logged.
pub async fn filter_datasets(
    catalog: &dyn CatalogClient,
    org_id: &OrganizationId,
    mut ids: Vec<DatasetId>,
) -> Vec<DatasetId> {
    match catalog.fetch_owned(org_id).await {
        Ok(owned) => ids.retain(|id| !owned.contains(id)),
        Err(e) => {
            tracing::warn!(org_id = %org_id, error = %e, "Ownership lookup failed, skipping filter");
        }
    }

    match catalog.fetch_visible(org_id).await {
        Ok(visible) => ids.retain(|id| visible.contains(id)),
        Err(e) => {
            tracing::warn!(org_id = %org_id, error = %e, "Visibility lookup failed, skipping filter");
        }
    }

    match catalog.fetch_live_ids().await {
        Ok(live) => ids.retain(|id| live.contains(id)),
        Err(e) => {
            tracing::warn!(error = %e, "Live catalog lookup failed, skipping filter");
        }
    }

    ids
}

/// Maps surviving ids to display metadata and truncates to the served
/// maximum. Ids with no metadata are dropped with a warning.
pub fn hydrate(
    ids: Vec<DatasetId>,
    dataset_info: &HashMap<DatasetId, DatasetMetadata>,
) -> Vec<DatasetMetadata> {
    let mut recommended = Vec::new();
    for id in ids {
        match dataset_info.get(&id) {
            Some(metadata) => recommended.push(metadata.clone()),
            None => {
                tracing::warn!(dataset_id = %id, "Dataset information cannot be retrieved");
            }
        }
    }

    recommended.truncate(MAX_RECOMMENDATIONS);
    recommended
}
