use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier for an organization (a marketplace tenant).
///
/// Upstream services are inconsistent about whether ids travel as JSON
/// strings or integers, so deserialization accepts both and canonicalizes
/// to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct OrganizationId(pub String);

/// Identifier for a data asset in the marketplace catalog.
///
/// Same canonicalization rule as [`OrganizationId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct DatasetId(pub String);

/// Helper accepting either JSON representation of an id
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Str(String),
}

impl From<IdRepr> for OrganizationId {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Int(n) => Self(n.to_string()),
            IdRepr::Str(s) => Self(s),
        }
    }
}

impl From<IdRepr> for DatasetId {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Int(n) => Self(n.to_string()),
            IdRepr::Str(s) => Self(s),
        }
    }
}

impl OrganizationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DatasetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrganizationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for DatasetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One scored data asset from a single signal source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub dataset_id: DatasetId,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(dataset_id: impl Into<DatasetId>, score: f64) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            score,
        }
    }
}

/// An organization's score list from one source.
///
/// Ids within a list are unique; lists handed to the combiner are sorted
/// ascending by dataset id.
pub type ScoreList = Vec<ScoreEntry>;

/// A fused ranking as persisted in the score store.
///
/// Entries are sorted descending by score, so index 0 is the single most
/// relevant asset for the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ScoreEntry>,
}

impl RankingSnapshot {
    pub fn new(entries: Vec<ScoreEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            entries,
        }
    }
}

/// Display metadata for one data asset, hydrated into responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub dataset_id: DatasetId,
    pub dataset_name: String,
    pub org_id: String,
    pub org_name: String,
    pub coverphoto: String,
}

// ============================================================================
// Internal Catalog API Types
// ============================================================================

/// One data asset as returned by the catalog listing
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDataAsset {
    pub id: DatasetId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coverphoto: String,
    #[serde(default)]
    pub categories: Vec<ApiCategory>,
    #[serde(default)]
    pub columns: Vec<ApiColumn>,
    #[serde(default)]
    pub organization: Option<ApiOrganization>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiColumn {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOrganization {
    pub id: OrganizationId,
    #[serde(default)]
    pub name: String,
}

/// One node of the category taxonomy tree
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTaxonomyNode {
    pub text: String,
    #[serde(default)]
    pub children: Vec<ApiTaxonomyChild>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTaxonomyChild {
    pub text: String,
}

/// Organization profile response carrying declared category preferences
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPreferences {
    #[serde(default)]
    pub categories: Vec<ApiCategory>,
}

/// Minimal shape of an owned/purchased asset record
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOwnedAsset {
    pub id: DatasetId,
}

impl From<&ApiDataAsset> for DatasetMetadata {
    fn from(asset: &ApiDataAsset) -> Self {
        let (org_id, org_name) = match &asset.organization {
            Some(org) => (org.id.to_string(), org.name.clone()),
            None => (String::new(), String::new()),
        };

        DatasetMetadata {
            dataset_id: asset.id.clone(),
            dataset_name: asset.name.clone(),
            org_id,
            org_name,
            coverphoto: asset.coverphoto.clone(),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of a recommendation request
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub org_id: OrganizationId,
}

/// Response carrying the final recommendation list
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommended_datasets: Vec<DatasetMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_id_from_json_string() {
        let id: OrganizationId = serde_json::from_str(r#""7""#).unwrap();
        assert_eq!(id, OrganizationId::from("7"));
    }

    #[test]
    fn test_organization_id_from_json_integer() {
        let id: OrganizationId = serde_json::from_str("7").unwrap();
        assert_eq!(id, OrganizationId::from("7"));
    }

    #[test]
    fn test_dataset_id_canonicalization_matches() {
        let from_int: DatasetId = serde_json::from_str("42").unwrap();
        let from_str: DatasetId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(from_int, from_str);
    }

    #[test]
    fn test_dataset_id_serializes_as_string() {
        let id = DatasetId::from("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""42""#);
    }

    #[test]
    fn test_score_entry_round_trip() {
        let entry = ScoreEntry::new("3", 2.5);
        let json = serde_json::to_string(&entry).unwrap();
        let back: ScoreEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_ranking_snapshot_preserves_entry_order() {
        let snapshot = RankingSnapshot::new(vec![
            ScoreEntry::new("9", 3.0),
            ScoreEntry::new("2", 2.0),
            ScoreEntry::new("5", 1.0),
        ]);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: RankingSnapshot = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = back.entries.iter().map(|e| e.dataset_id.as_str()).collect();
        assert_eq!(ids, vec!["9", "2", "5"]);
    }

    #[test]
    fn test_dataset_metadata_from_api_asset() {
        let asset = ApiDataAsset {
            id: DatasetId::from("123"),
            name: "Runway Throughput".to_string(),
            coverphoto: "11".to_string(),
            categories: vec![ApiCategory {
                name: "Weather".to_string(),
            }],
            columns: vec![],
            organization: Some(ApiOrganization {
                id: OrganizationId::from("456"),
                name: "Acme Airports".to_string(),
            }),
        };

        let metadata = DatasetMetadata::from(&asset);
        assert_eq!(metadata.dataset_id, DatasetId::from("123"));
        assert_eq!(metadata.dataset_name, "Runway Throughput");
        assert_eq!(metadata.org_id, "456");
        assert_eq!(metadata.org_name, "Acme Airports");
        assert_eq!(metadata.coverphoto, "11");
    }

    #[test]
    fn test_dataset_metadata_from_api_asset_without_owner() {
        let asset = ApiDataAsset {
            id: DatasetId::from("9"),
            name: String::new(),
            coverphoto: String::new(),
            categories: vec![],
            columns: vec![],
            organization: None,
        };

        let metadata = DatasetMetadata::from(&asset);
        assert_eq!(metadata.org_id, "");
        assert_eq!(metadata.org_name, "");
    }

    #[test]
    fn test_recommend_request_accepts_integer_org_id() {
        let request: RecommendRequest = serde_json::from_str(r#"{"org_id": 12}"#).unwrap();
        assert_eq!(request.org_id, OrganizationId::from("12"));
    }
}
