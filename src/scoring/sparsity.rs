use crate::error::{AppError, AppResult};

/// Ratio of observed interactions to the maximum possible interactions
/// (organizations × data assets).
///
/// The value weights the collaborative signal in fusion, so it is clamped to
/// `[0, 1]`; a noisy interaction count must not push the fusion weight out of
/// range. An empty catalog on either axis is a degenerate input — callers
/// fall back to sparsity `0` (pure semantic ranking) instead of propagating
/// the failure.
pub fn estimate_sparsity(
    interaction_count: u64,
    item_count: usize,
    org_count: usize,
) -> AppResult<f64> {
    let cells = (item_count as u64) * (org_count as u64);
    if cells == 0 {
        return Err(AppError::DegenerateInput(
            "interaction matrix has no cells".to_string(),
        ));
    }

    let sparsity = interaction_count as f64 / cells as f64;
    Ok(sparsity.clamp(0.0, 1.0))
}
