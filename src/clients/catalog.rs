use std::collections::HashSet;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ApiDataAsset, ApiOrganization, ApiOwnedAsset, ApiPreferences, ApiTaxonomyNode, DatasetId, OrganizationId},
};

use super::CatalogClient;

/// Catalog collaborator backed by the internal marketplace API
pub struct HttpCatalogClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    /// Issues a GET and deserializes the body, treating non-2xx as failure
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(path = %path, status = %status, "Catalog request failed");
            return Err(AppError::ExternalApi(format!(
                "Catalog returned status {} for {}",
                status, path
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_taxonomy(&self) -> AppResult<HashSet<String>> {
        let nodes: Vec<ApiTaxonomyNode> = self.get_json("/categories").await?;

        let mut labels = HashSet::new();
        for node in nodes {
            labels.insert(node.text.to_lowercase());
            for child in node.children {
                labels.insert(child.text.to_lowercase());
            }
        }

        tracing::debug!(label_count = labels.len(), "Taxonomy retrieved");
        Ok(labels)
    }

    async fn fetch_preferences(&self, org_id: &OrganizationId) -> AppResult<HashSet<String>> {
        let path = format!("/organizations/{}/profile", org_id);
        let preferences: ApiPreferences = match self.get_json(&path).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(org_id = %org_id, error = %e, "Preference fetch failed, using empty set");
                return Ok(HashSet::new());
            }
        };

        let categories = preferences
            .categories
            .into_iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        Ok(categories)
    }

    async fn fetch_dataset_catalog(&self) -> AppResult<Vec<ApiDataAsset>> {
        let assets: Vec<ApiDataAsset> = self.get_json("/assets").await?;
        tracing::debug!(asset_count = assets.len(), "Dataset catalog retrieved");
        Ok(assets)
    }

    async fn fetch_organizations(&self) -> AppResult<Vec<OrganizationId>> {
        let organizations: Vec<ApiOrganization> = self.get_json("/organizations").await?;
        Ok(organizations.into_iter().map(|org| org.id).collect())
    }

    async fn fetch_owned(&self, org_id: &OrganizationId) -> AppResult<HashSet<DatasetId>> {
        let path = format!("/organizations/{}/assets", org_id);
        let owned: Vec<ApiOwnedAsset> = self.get_json(&path).await?;
        Ok(owned.into_iter().map(|asset| asset.id).collect())
    }

    async fn fetch_visible(&self, org_id: &OrganizationId) -> AppResult<HashSet<DatasetId>> {
        let path = format!("/organizations/{}/visible-assets", org_id);
        let visible: Vec<DatasetId> = self.get_json(&path).await?;
        Ok(visible.into_iter().collect())
    }

    async fn fetch_live_ids(&self) -> AppResult<HashSet<DatasetId>> {
        let ids: Vec<DatasetId> = self.get_json("/assets/ids").await?;
        Ok(ids.into_iter().collect())
    }
}
