use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{DatasetId, ScoreEntry, ScoreList};

/// Fuses the three per-organization score lists into one ranking.
///
/// Per asset: `semantic * (1 - sparsity) + avg(item, user) * sparsity`.
/// The join is keyed on dataset id — the three lists must cover exactly the
/// same id universe, and any mismatch aborts with [`AppError::Alignment`]
/// rather than silently pairing the wrong assets. The semantic list supplies
/// the reference ids.
///
/// The result is sorted descending by fused score: index 0 is the single
/// most relevant asset. If any input list is empty the ranking is empty.
pub fn fuse(
    semantic: &ScoreList,
    item: &ScoreList,
    user: &ScoreList,
    sparsity: f64,
) -> AppResult<Vec<ScoreEntry>> {
    if semantic.is_empty() || item.is_empty() || user.is_empty() {
        return Ok(Vec::new());
    }

    if item.len() != semantic.len() || user.len() != semantic.len() {
        return Err(AppError::Alignment(format!(
            "list lengths differ: semantic={}, item={}, user={}",
            semantic.len(),
            item.len(),
            user.len()
        )));
    }

    let item_scores = scores_by_id(item)?;
    let user_scores = scores_by_id(user)?;

    let mut fused = Vec::with_capacity(semantic.len());
    for entry in semantic {
        let item_score = lookup(&item_scores, &entry.dataset_id, "item")?;
        let user_score = lookup(&user_scores, &entry.dataset_id, "user")?;

        let score =
            entry.score * (1.0 - sparsity) + ((item_score + user_score) / 2.0) * sparsity;
        fused.push(ScoreEntry {
            dataset_id: entry.dataset_id.clone(),
            score,
        });
    }

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(fused)
}

fn scores_by_id(list: &ScoreList) -> AppResult<HashMap<&DatasetId, f64>> {
    let map: HashMap<&DatasetId, f64> = list
        .iter()
        .map(|entry| (&entry.dataset_id, entry.score))
        .collect();

    if map.len() != list.len() {
        return Err(AppError::Alignment(
            "duplicate dataset ids within a score list".to_string(),
        ));
    }

    Ok(map)
}

fn lookup(scores: &HashMap<&DatasetId, f64>, id: &DatasetId, source: &str) -> AppResult<f64> {
    scores.get(id).copied().ok_or_else(|| {
        AppError::Alignment(format!("dataset {} missing from {} scores", id, source))
    })
}
