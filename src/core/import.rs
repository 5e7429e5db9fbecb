use crate::domain::model::{ExternalListing, ScrapedListing};
use crate::utils::error::{GaleriError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn price_noise() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // thousands separators, spaces and the "TL" suffix
    RE.get_or_init(|| Regex::new(r"[. TL]").expect("static regex"))
}

fn leading_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+").expect("static regex"))
}

/// Parses a display price such as `"1.385.000 TL"`.
///
/// Only the leading digit run counts, so `"1.385.000 TL'den"` is 1385000.
pub fn parse_price(raw: &str) -> Option<i64> {
    let cleaned = price_noise().replace_all(raw, "");
    leading_integer()
        .find(cleaned.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses a dotted integer such as `"172.000"`.
pub fn parse_km(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub rows: Vec<ExternalListing>,
    /// Items without a Sahibinden id.
    pub skipped: usize,
    /// Items whose price could not be parsed and was stored as 0.
    pub unpriced: usize,
}

impl From<&ScrapedListing> for ExternalListing {
    fn from(item: &ScrapedListing) -> Self {
        Self {
            sahibinden_id: item.sahibinden_id.trim().to_string(),
            title: item.title.trim().to_string(),
            price: parse_price(&item.price).unwrap_or(0),
            model: item.model.trim().to_string(),
            year: parse_year(&item.year),
            km: parse_km(&item.km),
            image_url: item.image_url.clone(),
            original_link: item.link.clone(),
        }
    }
}

/// Converts a Sahibinden scrape export (a JSON array) into `external_listings` rows.
///
/// Rows are unique by `sahibinden_id`; a later duplicate replaces the earlier
/// one, the same way the upsert resolves conflicts.
pub fn import_scraped(json: &str) -> Result<ImportBatch> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(GaleriError::ImportError {
            message: "scraped data must be a JSON array".to_string(),
        });
    }
    let items: Vec<ScrapedListing> = serde_json::from_value(value)?;

    let mut rows: Vec<ExternalListing> = Vec::with_capacity(items.len());
    let mut skipped = 0;
    let mut unpriced = 0;

    for item in &items {
        if item.sahibinden_id.trim().is_empty() {
            tracing::warn!("Skipping scraped item without sahibindenId: {:?}", item.title);
            skipped += 1;
            continue;
        }

        let row = ExternalListing::from(item);
        if parse_price(&item.price).is_none() {
            tracing::warn!(
                "Could not parse price for sahibindenId {}: {:?}",
                row.sahibinden_id,
                item.price
            );
            unpriced += 1;
        }

        match rows.iter_mut().find(|r| r.sahibinden_id == row.sahibinden_id) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }

    tracing::info!(
        "Prepared {} external listings ({} skipped, {} without price)",
        rows.len(),
        skipped,
        unpriced
    );

    Ok(ImportBatch {
        rows,
        skipped,
        unpriced,
    })
}
