//! HTTP document store speaking the collections REST API.

use crate::collection::model::CollectionTree;
use crate::error::SyncError;
use crate::store::{CollectionEnvelope, DocumentStore};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "X-Api-Key";

pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_name: String,
}

impl HttpDocumentStore {
    /// `default_name` names the empty tree used when a fetched document has no items.
    pub fn new(base_url: &str, api_key: &str, default_name: &str) -> Result<Self, SyncError> {
        if api_key.trim().is_empty() {
            return Err(SyncError::ConfigError(
                "Document store API key is not set".to_string(),
            ));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(HttpDocumentStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            default_name: default_name.to_string(),
        })
    }

    /// `{base}/collections` or `{base}/collections/{id}`.
    pub fn collection_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/collections/{}", self.base_url, id),
            None => format!("{}/collections", self.base_url),
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("collection-sync/", env!("CARGO_PKG_VERSION")))
    }

    async fn write(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
        tree: &CollectionTree,
    ) -> Result<(), SyncError> {
        let body = serde_json::to_vec(&CollectionEnvelope { collection: tree })?;
        let response = self
            .authorized(builder)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::WriteFailed {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        debug!(operation, status = status.as_u16(), "Document store write succeeded");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn fetch(&self, id: &str) -> Result<Option<CollectionTree>, SyncError> {
        let url = self.collection_url(Some(id));
        debug!(url = %url, "Fetching collection");
        let response = self.authorized(self.client.get(&url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!(id, "Collection not found, a new one will be created");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::FetchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let document: Value = response.json().await?;
        Ok(Some(CollectionTree::from_document(document, &self.default_name)?))
    }

    async fn create(&self, tree: &CollectionTree) -> Result<(), SyncError> {
        let builder = self.client.post(self.collection_url(None));
        self.write("POST", builder, tree).await
    }

    async fn replace(&self, id: &str, tree: &CollectionTree) -> Result<(), SyncError> {
        let builder = self.client.put(self.collection_url(Some(id)));
        self.write("PUT", builder, tree).await
    }
}
