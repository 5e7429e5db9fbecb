use crate::domain::model::Listing;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_PRICE: i64 = 0;
pub const DEFAULT_MAX_PRICE: i64 = 10_000_000;

/// Visitor-facing inventory filter. `None` means "all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub min_price: i64,
    pub max_price: i64,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            brand: None,
            model: None,
            year: None,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl ListingFilter {
    /// Changing the brand clears the model, since models are per brand.
    pub fn set_brand(&mut self, brand: Option<String>) {
        if self.brand != brand {
            self.model = None;
        }
        self.brand = brand;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.brand.as_ref().map_or(true, |b| *b == listing.brand)
            && self.model.as_ref().map_or(true, |m| *m == listing.model)
            && self.year.map_or(true, |y| y == listing.year)
            && listing.price >= self.min_price
            && listing.price <= self.max_price
    }

    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        let filtered: Vec<&Listing> = listings.iter().filter(|l| self.matches(l)).collect();
        tracing::debug!(
            "Filter {:?} kept {} of {} listings",
            self,
            filtered.len(),
            listings.len()
        );
        filtered
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Distinct brands, first-seen order.
pub fn brands(listings: &[Listing]) -> Vec<String> {
    unique_in_order(listings.iter().map(|l| l.brand.as_str()))
}

/// Distinct models, limited to `brand` when one is selected.
pub fn models(listings: &[Listing], brand: Option<&str>) -> Vec<String> {
    unique_in_order(
        listings
            .iter()
            .filter(|l| brand.map_or(true, |b| l.brand == b))
            .map(|l| l.model.as_str()),
    )
}

/// Distinct model years, newest first.
pub fn years(listings: &[Listing]) -> Vec<i32> {
    let mut years: Vec<i32> = listings.iter().map(|l| l.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

pub fn find_by_id<'a>(listings: &'a [Listing], id: &str) -> Option<&'a Listing> {
    listings.iter().find(|l| l.id == id)
}
