pub mod collaborative;
pub mod hybrid;
pub mod semantic;
pub mod sparsity;

pub use collaborative::score_catalog;
pub use hybrid::fuse;
pub use semantic::SemanticScorer;
pub use sparsity::estimate_sparsity;
