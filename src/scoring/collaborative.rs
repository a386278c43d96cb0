use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::model::CfModel;
use crate::models::{DatasetId, OrganizationId, ScoreEntry, ScoreList};

/// Scores every (organization, data asset) pair through a pre-trained model.
///
/// Used identically for the item-based and user-based variants; the variant
/// lives in which model dump was loaded. Each organization's list is sorted
/// ascending by dataset id to satisfy the combiner's ordering contract.
pub fn score_catalog(
    model: &CfModel,
    organizations: &[OrganizationId],
    datasets: &[DatasetId],
) -> AppResult<HashMap<OrganizationId, ScoreList>> {
    if organizations.is_empty() || datasets.is_empty() {
        return Err(AppError::NoCatalogData(
            "no data assets or organizations retrieved".to_string(),
        ));
    }

    let mut scores = HashMap::with_capacity(organizations.len());
    for org_id in organizations {
        let mut list: ScoreList = datasets
            .iter()
            .map(|dataset_id| ScoreEntry {
                dataset_id: dataset_id.clone(),
                score: model.predict(org_id, dataset_id),
            })
            .collect();
        list.sort_by(|a, b| a.dataset_id.cmp(&b.dataset_id));

        scores.insert(org_id.clone(), list);
    }

    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_model() -> CfModel {
        serde_json::from_str(r#"{"global_mean": 1.5}"#).unwrap()
    }

    fn ids<T: for<'a> From<&'a str>>(raw: &[&str]) -> Vec<T> {
        raw.iter().map(|s| T::from(*s)).collect()
    }

    #[test]
    fn test_every_pair_is_scored() {
        let orgs: Vec<OrganizationId> = ids(&["1", "2"]);
        let datasets: Vec<DatasetId> = ids(&["10", "11", "12"]);

        let scores = score_catalog(&flat_model(), &orgs, &datasets).unwrap();

        assert_eq!(scores.len(), 2);
        for org in &orgs {
            assert_eq!(scores[org].len(), 3);
            assert!(scores[org].iter().all(|entry| entry.score == 1.5));
        }
    }

    #[test]
    fn test_lists_sorted_ascending_by_dataset_id() {
        let orgs: Vec<OrganizationId> = ids(&["1"]);
        let datasets: Vec<DatasetId> = ids(&["9", "2", "5"]);

        let scores = score_catalog(&flat_model(), &orgs, &datasets).unwrap();
        let sorted: Vec<&str> = scores[&orgs[0]]
            .iter()
            .map(|e| e.dataset_id.as_str())
            .collect();
        assert_eq!(sorted, vec!["2", "5", "9"]);
    }

    #[test]
    fn test_empty_dataset_catalog_is_an_error() {
        let orgs: Vec<OrganizationId> = ids(&["1"]);
        let result = score_catalog(&flat_model(), &orgs, &[]);
        assert!(matches!(result, Err(AppError::NoCatalogData(_))));
    }

    #[test]
    fn test_empty_organization_catalog_is_an_error() {
        let datasets: Vec<DatasetId> = ids(&["10"]);
        let result = score_catalog(&flat_model(), &[], &datasets);
        assert!(matches!(result, Err(AppError::NoCatalogData(_))));
    }
}
