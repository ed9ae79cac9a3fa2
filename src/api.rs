use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{ExportError, Result};
use crate::record::{is_safe_alias, CollectionRecord};

const USER_AGENT: &str = concat!("cdm_collections/", env!("CARGO_PKG_VERSION"));

/// One entry of `dmGetCollectionList`. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct ApiCollection {
    alias: String,
    name: String,
}

/// Blocking client for the CONTENTdm web services API.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ExportError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(ApiClient { client, base_url })
    }

    fn endpoint(&self, query: &str) -> String {
        format!("{}/dmwebservices/index.php?q={}", self.base_url, query)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|source| ExportError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Alias and title of every collection the server knows about.
    pub fn list_collections(&self) -> Result<Vec<CollectionRecord>> {
        let url = self.endpoint("dmGetCollectionList/json");
        tracing::debug!("Fetching collection list from {}", url);
        let body = self.get_text(&url)?;
        parse_collection_list(&body).map_err(|source| ExportError::Json { url, source })
    }

    /// Raw field configuration JSON for one collection, unmodified.
    pub fn fetch_field_info(&self, alias: &str) -> Result<String> {
        let url = self.endpoint(&format!("dmGetCollectionFieldInfo/{}/json", alias));
        tracing::debug!("Fetching field info from {}", url);
        self.get_text(&url)
    }
}

/// Turn a `dmGetCollectionList` response into two-field records.
///
/// Entries whose alias cannot name an output directory are skipped.
pub fn parse_collection_list(body: &str) -> serde_json::Result<Vec<CollectionRecord>> {
    let collections: Vec<ApiCollection> = serde_json::from_str(body)?;
    Ok(collections
        .into_iter()
        .filter_map(|c| {
            let alias = c.alias.trim_matches('/');
            if !is_safe_alias(alias) {
                tracing::warn!("Skipping collection {:?}: unusable alias {:?}", c.name, c.alias);
                return None;
            }
            Some(CollectionRecord::from_api(alias, c.name))
        })
        .collect())
}
