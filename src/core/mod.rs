pub mod catalog;
pub mod consistency;
pub mod diagram;
pub mod import;
pub mod renderer;
pub mod updater;

pub use crate::domain::expertise::{Condition, ExpertiseReport, Panel};
pub use crate::domain::model::{Listing, UpdateOutcome};
pub use crate::domain::ports::{ConsistencyChecker, ListingSource, ListingStore, Storage};
pub use crate::utils::error::Result;
