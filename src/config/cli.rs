use crate::core::{Listing, ListingSource, ListingStore, Storage};
use crate::domain::model::ListingDraft;
use crate::utils::error::{GaleriError, Result};
use crate::utils::validation::Validate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

/// Listings kept as a JSON array in a file.
#[derive(Debug, Clone)]
pub struct JsonFileSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> JsonFileSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub async fn write_listings(&self, listings: &[Listing]) -> Result<()> {
        let data = serde_json::to_vec_pretty(listings)?;
        self.storage.write_file(&self.path, &data).await
    }
}

impl<S: Storage> JsonFileSource<S> {
    /// Like `fetch_listings`, but a missing file is an empty inventory.
    async fn load_for_write(&self) -> Result<Vec<Listing>> {
        match self.fetch_listings().await {
            Err(GaleriError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", self.path);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn position(listings: &[Listing], id: &str) -> Result<usize> {
        listings
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| GaleriError::NotFound { id: id.to_string() })
    }
}

/// Next numeric id after the largest numeric id in the file.
fn next_id(listings: &[Listing]) -> Result<String> {
    let max = listings
        .iter()
        .filter_map(|l| l.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    max.checked_add(1)
        .map(|id| id.to_string())
        .ok_or_else(|| GaleriError::ValidationError {
            field: "id".to_string(),
            message: "no numeric id left after the largest stored id".to_string(),
        })
}

impl<S: Storage> ListingStore for JsonFileSource<S> {
    async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing> {
        draft.validate()?;
        let mut listings = self.load_for_write().await?;

        let listing = draft.clone().into_listing(next_id(&listings)?);
        listings.push(listing.clone());
        self.write_listings(&listings).await?;

        tracing::info!("Added listing {} to {}", listing.id, self.path);
        Ok(listing)
    }

    async fn update_listing(&self, id: &str, draft: &ListingDraft) -> Result<Listing> {
        draft.validate()?;
        let mut listings = self.load_for_write().await?;

        let index = Self::position(&listings, id)?;
        let listing = draft.clone().into_listing(id);
        listings[index] = listing.clone();
        self.write_listings(&listings).await?;

        tracing::info!("Updated listing {} in {}", id, self.path);
        Ok(listing)
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        let mut listings = self.load_for_write().await?;

        let index = Self::position(&listings, id)?;
        listings.remove(index);
        self.write_listings(&listings).await?;

        tracing::info!("Deleted listing {} from {}", id, self.path);
        Ok(())
    }
}

impl<S: Storage> ListingSource for JsonFileSource<S> {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let data = self.storage.read_file(&self.path).await?;
        let listings: Vec<Listing> = serde_json::from_slice(&data)?;
        tracing::debug!("Loaded {} listings from {}", listings.len(), self.path);
        Ok(listings)
    }
}
