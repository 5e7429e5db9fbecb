//! Read and upsert access to the managed Postgres store through its REST gateway.

use crate::core::{Listing, ListingSource, ListingStore};
use crate::domain::model::{ExternalListing, ListingDraft};
use crate::utils::error::{GaleriError, Result};
use crate::utils::validation::Validate;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

pub const EXTERNAL_LISTINGS_TABLE: &str = "external_listings";

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: "listings".to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Result<Self> {
        self.client = Client::builder()
            .timeout(Duration::from_secs(seconds))
            .build()?;
        Ok(self)
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::error!("Store request failed with {}: {}", status, message);
        Err(GaleriError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn fetch_listing(&self, id: &str) -> Result<Listing> {
        let url = self.endpoint(&self.table);
        tracing::debug!("Fetching listing {} from {}", id, url);

        let request = self
            .client
            .get(&url)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;

        let mut rows: Vec<Listing> = response.json().await?;
        if rows.is_empty() {
            return Err(GaleriError::NotFound { id: id.to_string() });
        }
        Ok(rows.swap_remove(0))
    }

    /// Upserts scraped rows, resolving conflicts on `sahibinden_id`.
    pub async fn upsert_external(&self, rows: &[ExternalListing]) -> Result<usize> {
        if rows.is_empty() {
            tracing::info!("Nothing to upsert");
            return Ok(0);
        }

        let url = self.endpoint(EXTERNAL_LISTINGS_TABLE);
        tracing::debug!("Upserting {} rows into {}", rows.len(), url);

        let request = self
            .client
            .post(&url)
            .query(&[("on_conflict", "sahibinden_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows);
        Self::ensure_success(self.authorized(request).send().await?).await?;

        tracing::info!("Upserted {} external listings", rows.len());
        Ok(rows.len())
    }
}

/// Writes ask for `return=representation` so the stored row comes back.
impl ListingStore for SupabaseClient {
    async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing> {
        draft.validate()?;
        let url = self.endpoint(&self.table);
        tracing::debug!("Inserting listing {:?} into {}", draft.title, url);

        let request = self
            .client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(draft);
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;
        let status = response.status().as_u16();

        let rows: Vec<Listing> = response.json().await?;
        let listing = rows.into_iter().next().ok_or_else(|| GaleriError::ApiError {
            status,
            message: "insert returned no row".to_string(),
        })?;
        tracing::info!("Added listing {}", listing.id);
        Ok(listing)
    }

    async fn update_listing(&self, id: &str, draft: &ListingDraft) -> Result<Listing> {
        draft.validate()?;
        let url = self.endpoint(&self.table);
        tracing::debug!("Updating listing {} at {}", id, url);

        let request = self
            .client
            .patch(&url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(draft);
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;

        let rows: Vec<Listing> = response.json().await?;
        let listing = rows
            .into_iter()
            .next()
            .ok_or_else(|| GaleriError::NotFound { id: id.to_string() })?;
        tracing::info!("Updated listing {}", id);
        Ok(listing)
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&self.table);
        tracing::debug!("Deleting listing {} at {}", id, url);

        let request = self
            .client
            .delete(&url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;

        // Deleted rows are only counted, so their shape does not matter.
        let rows: Vec<serde_json::Value> = response.json().await?;
        if rows.is_empty() {
            return Err(GaleriError::NotFound { id: id.to_string() });
        }
        tracing::info!("Deleted listing {}", id);
        Ok(())
    }
}

impl ListingSource for SupabaseClient {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let url = self.endpoint(&self.table);
        tracing::debug!("Fetching listings from {}", url);

        let request = self.client.get(&url).query(&[("select", "*")]);
        let response = Self::ensure_success(self.authorized(request).send().await?).await?;

        let listings: Vec<Listing> = response.json().await?;
        tracing::debug!("Store returned {} listings", listings.len());
        Ok(listings)
    }
}
