use crate::domain::expertise::ExpertiseReport;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// A vehicle listing as stored in the `listings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    /// Price in Turkish lira.
    pub price: i64,
    #[serde(rename = "kilometer", alias = "km")]
    pub km: i64,
    #[serde(rename = "image_urls", alias = "imageUrls", default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub expertise_report: Option<ExpertiseReport>,
}

/// What the detail page shows in the expertise card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertiseStatus {
    NotEntered,
    FullyOriginal,
    HasFindings,
}

impl Listing {
    pub fn expertise_status(&self) -> ExpertiseStatus {
        match &self.expertise_report {
            None => ExpertiseStatus::NotEntered,
            Some(report) if report.is_fully_original() => ExpertiseStatus::FullyOriginal,
            Some(_) => ExpertiseStatus::HasFindings,
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Admin form input for creating or editing a listing.
///
/// Serializes as a `listings` row without its id, so it doubles as the
/// insert and update body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: i64,
    #[serde(rename = "kilometer", alias = "km")]
    pub km: i64,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expertise_report: ExpertiseReport,
}

impl ListingDraft {
    /// Blank admin form: current model year, zero price and km, all panels original.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            brand: String::new(),
            model: String::new(),
            year: chrono::Local::now().year(),
            price: 0,
            km: 0,
            image_urls: Vec::new(),
            description: None,
            expertise_report: ExpertiseReport::original(),
        }
    }

    pub fn into_listing(self, id: impl Into<String>) -> Listing {
        Listing {
            id: id.into(),
            title: self.title,
            brand: self.brand,
            model: self.model,
            year: self.year,
            price: self.price,
            km: self.km,
            image_urls: self.image_urls,
            description: self.description,
            expertise_report: Some(self.expertise_report),
        }
    }
}

impl From<&Listing> for ListingDraft {
    fn from(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            brand: listing.brand.clone(),
            model: listing.model.clone(),
            year: listing.year,
            price: listing.price,
            km: listing.km,
            image_urls: listing.image_urls.clone(),
            description: listing.description.clone(),
            expertise_report: listing.expertise_report.unwrap_or_default(),
        }
    }
}

/// One item of a Sahibinden scrape export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedListing {
    pub sahibinden_id: String,
    pub title: String,
    /// Display price such as `"1.385.000 TL"`.
    pub price: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub km: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link: String,
}

/// Row of the `external_listings` table, keyed by `sahibinden_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalListing {
    pub sahibinden_id: String,
    pub title: String,
    pub price: i64,
    pub model: String,
    pub year: Option<i32>,
    pub km: Option<i64>,
    pub image_url: String,
    pub original_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingChange {
    Added { id: String },
    Removed { id: String },
    Price { id: String, from: i64, to: i64 },
    Specs { id: String, field: String },
    Expertise { id: String },
    Cosmetic { id: String, field: String },
}

impl ListingChange {
    pub fn is_meaningful(&self) -> bool {
        !matches!(self, Self::Cosmetic { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyDecision {
    pub should_update: bool,
    pub reason: String,
    pub changes: Vec<ListingChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    pub status: String,
    pub reason: String,
    pub updated: bool,
    pub checked_at: DateTime<Utc>,
}
