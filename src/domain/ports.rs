use crate::domain::model::{ConsistencyDecision, Listing, ListingDraft};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Anything that can hand out the current set of listings.
pub trait ListingSource: Send + Sync {
    fn fetch_listings(&self) -> impl std::future::Future<Output = Result<Vec<Listing>>> + Send;
}

/// A listing source the admin back office can write to.
///
/// Drafts are validated before anything is written.
pub trait ListingStore: ListingSource {
    fn create_listing(
        &self,
        draft: &ListingDraft,
    ) -> impl std::future::Future<Output = Result<Listing>> + Send;
    fn update_listing(
        &self,
        id: &str,
        draft: &ListingDraft,
    ) -> impl std::future::Future<Output = Result<Listing>> + Send;
    fn delete_listing(&self, id: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Decides whether freshly scraped listings are worth persisting.
#[async_trait]
pub trait ConsistencyChecker: Send + Sync {
    async fn check(&self, current: &[Listing], fresh: &[Listing]) -> Result<ConsistencyDecision>;
}
