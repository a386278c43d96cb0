//! Marketplace collaborator abstractions
//!
//! The catalog and auth services are consumed through narrow traits so the
//! scoring and serving pipelines never see a concrete protocol. Handlers and
//! services hold `Arc<dyn ...>`; tests substitute mocks.

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{ApiDataAsset, DatasetId, OrganizationId},
};

pub mod auth;
pub mod catalog;

pub use auth::HttpAuthClient;
pub use catalog::HttpCatalogClient;

/// Read-only view of the marketplace catalog services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Valid category labels, lower-cased, taxonomy tree flattened
    async fn fetch_taxonomy(&self) -> AppResult<HashSet<String>>;

    /// Category labels an organization declared in its profile, lower-cased.
    ///
    /// Degrades to an empty set on upstream failure; the semantic signal for
    /// that organization then scores everything zero instead of failing the
    /// cycle.
    async fn fetch_preferences(&self, org_id: &OrganizationId) -> AppResult<HashSet<String>>;

    /// Full data-asset listing with categories, columns and owner info
    async fn fetch_dataset_catalog(&self) -> AppResult<Vec<ApiDataAsset>>;

    /// All organization ids known to the marketplace
    async fn fetch_organizations(&self) -> AppResult<Vec<OrganizationId>>;

    /// Ids of assets the organization already owns or purchased
    async fn fetch_owned(&self, org_id: &OrganizationId) -> AppResult<HashSet<DatasetId>>;

    /// Ids of assets visible to the organization
    async fn fetch_visible(&self, org_id: &OrganizationId) -> AppResult<HashSet<DatasetId>>;

    /// Ids present in the live catalog; anything absent has been deleted
    async fn fetch_live_ids(&self) -> AppResult<HashSet<DatasetId>>;
}

/// Session validation against the marketplace auth service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuthClient: Send + Sync {
    /// Returns `true` when the session cookie is accepted upstream
    async fn validate(&self, cookie: &str) -> AppResult<bool>;
}
