use crate::domain::model::{Listing, UpdateOutcome};
use crate::domain::ports::{ConsistencyChecker, ListingSource};
use crate::utils::error::Result;
use chrono::Utc;

/// Compares the stored inventory with a fresh scrape and decides whether to persist it.
pub struct UpdateEngine<Cur: ListingSource, New: ListingSource, C: ConsistencyChecker> {
    current: Cur,
    fresh: New,
    checker: C,
}

/// Outcome plus the fresh listings, so the caller can persist them when `updated`.
#[derive(Debug, Clone)]
pub struct UpdateRun {
    pub outcome: UpdateOutcome,
    pub fresh: Vec<Listing>,
}

impl<Cur: ListingSource, New: ListingSource, C: ConsistencyChecker> UpdateEngine<Cur, New, C> {
    pub fn new(current: Cur, fresh: New, checker: C) -> Self {
        Self {
            current,
            fresh,
            checker,
        }
    }

    pub async fn run(&self) -> Result<UpdateRun> {
        tracing::info!("Starting listing update check");

        let current = self.current.fetch_listings().await?;
        tracing::info!("Loaded {} current listings", current.len());

        let fresh = self.fresh.fetch_listings().await?;
        tracing::info!("Loaded {} fresh listings", fresh.len());

        let decision = self.checker.check(&current, &fresh).await?;
        let status = if decision.should_update {
            "updated"
        } else {
            "skipped"
        };
        tracing::info!("Update {}: {}", status, decision.reason);

        Ok(UpdateRun {
            outcome: UpdateOutcome {
                status: status.to_string(),
                reason: decision.reason,
                updated: decision.should_update,
                checked_at: Utc::now(),
            },
            fresh,
        })
    }
}
