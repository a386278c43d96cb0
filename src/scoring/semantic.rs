use std::collections::{BTreeMap, HashSet};

use crate::models::{ApiDataAsset, DatasetId, ScoreEntry, ScoreList};

/// Content-overlap scorer built once per batch cycle.
///
/// Each data asset is tagged with the taxonomy labels found among its
/// declared categories and its column titles (a title is split on `.` and
/// every segment checked against the taxonomy). Scoring one organization is
/// then a pure function of its preference set.
pub struct SemanticScorer {
    taxonomy: HashSet<String>,
    dataset_categories: BTreeMap<DatasetId, Vec<String>>,
}

impl SemanticScorer {
    pub fn new(taxonomy: HashSet<String>, catalog: &[ApiDataAsset]) -> Self {
        let mut dataset_categories = BTreeMap::new();

        for asset in catalog {
            let mut labels = Vec::new();

            for category in &asset.categories {
                let label = category.name.to_lowercase();
                if taxonomy.contains(&label) {
                    labels.push(label);
                }
            }

            for column in &asset.columns {
                for segment in column.title.split('.') {
                    let label = segment.to_lowercase();
                    if taxonomy.contains(&label) {
                        labels.push(label);
                    }
                }
            }

            dataset_categories.insert(asset.id.clone(), labels);
        }

        Self {
            taxonomy,
            dataset_categories,
        }
    }

    /// Ranks every catalogued asset for one organization.
    ///
    /// Raw score per asset is the number of (preference, label) matches over
    /// `|preferences| * |label occurrences|`, then linearly rescaled into
    /// `[1, 3]` across the organization's assets. When every raw score is
    /// equal the rescale is undefined and all scores collapse to `0`.
    ///
    /// The returned list is sorted ascending by dataset id, which is the
    /// ordering contract the combiner relies on.
    pub fn score(&self, preferences: &HashSet<String>) -> ScoreList {
        let preferences: Vec<&String> = preferences
            .iter()
            .filter(|p| self.taxonomy.contains(*p))
            .collect();

        let mut scores: ScoreList = self
            .dataset_categories
            .iter()
            .map(|(dataset_id, labels)| {
                let matches = preferences
                    .iter()
                    .map(|pref| labels.iter().filter(|label| label == pref).count())
                    .sum::<usize>();
                let denominator = preferences.len() * labels.len();

                let raw = if denominator > 0 {
                    matches as f64 / denominator as f64
                } else {
                    0.0
                };

                ScoreEntry {
                    dataset_id: dataset_id.clone(),
                    score: raw,
                }
            })
            .collect();

        normalize_scores(&mut scores);
        scores
    }

    /// Ids of every catalogued asset, in the scorer's ascending order
    pub fn dataset_ids(&self) -> Vec<DatasetId> {
        self.dataset_categories.keys().cloned().collect()
    }
}

/// Rescales raw scores into `[1, 3]` in place; degenerate spans become `0`
fn normalize_scores(scores: &mut ScoreList) {
    if scores.is_empty() {
        return;
    }

    let min = scores.iter().map(|e| e.score).fold(f64::INFINITY, f64::min);
    let max = scores
        .iter()
        .map(|e| e.score)
        .fold(f64::NEG_INFINITY, f64::max);

    if max > min {
        for entry in scores.iter_mut() {
            entry.score = (entry.score - min) / (max - min) * 2.0 + 1.0;
        }
    } else {
        tracing::warn!(
            dataset_count = scores.len(),
            "All raw semantic scores are equal, collapsing to zero"
        );
        for entry in scores.iter_mut() {
            entry.score = 0.0;
        }
    }
}
