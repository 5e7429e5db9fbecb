use anyhow::Result;
use oto_galeri::core::consistency::{ConsistencyRules, RuleBasedChecker};
use oto_galeri::core::updater::UpdateEngine;
use oto_galeri::domain::model::ListingChange;
use oto_galeri::{JsonFileSource, Listing, LocalStorage};
use tempfile::TempDir;

fn listing(id: &str, price: i64) -> Listing {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("İlan {}", id),
        "brand": "Volkswagen",
        "model": "Passat 1.6 TDI",
        "year": 2017,
        "price": price,
        "kilometer": 172000,
        "image_urls": ["https://example.com/a.avif"]
    }))
    .unwrap()
}

fn stock() -> Vec<Listing> {
    vec![
        listing("1", 1_385_000),
        listing("2", 575_000),
        listing("3", 625_000),
        listing("4", 1_099_000),
    ]
}

#[test]
fn test_identical_scrape_is_skipped() {
    let decision = RuleBasedChecker::default().decide(&stock(), &stock());

    assert!(!decision.should_update);
    assert!(decision.changes.is_empty());
    assert_eq!(decision.reason, "No changes detected");
}

#[test]
fn test_empty_scrape_is_treated_as_glitch() {
    let decision = RuleBasedChecker::default().decide(&stock(), &[]);
    assert!(!decision.should_update);
}

#[test]
fn test_first_scrape_into_empty_store_updates() {
    let decision = RuleBasedChecker::default().decide(&[], &stock());

    assert!(decision.should_update);
    assert_eq!(decision.changes.len(), 4);
    assert!(decision
        .changes
        .iter()
        .all(|c| matches!(c, ListingChange::Added { .. })));
}

#[test]
fn test_mass_removal_is_treated_as_glitch() {
    let fresh = vec![listing("1", 1_385_000)];
    let decision = RuleBasedChecker::default().decide(&stock(), &fresh);

    assert!(!decision.should_update);
    assert!(decision.reason.contains("3 of 4"));
}

#[test]
fn test_price_move_respects_threshold() {
    let mut fresh = stock();
    fresh[0].price = 1_380_000;
    let small = RuleBasedChecker::default().decide(&stock(), &fresh);
    assert!(!small.should_update);
    assert_eq!(
        small.changes,
        vec![ListingChange::Cosmetic {
            id: "1".to_string(),
            field: "price".to_string()
        }]
    );

    fresh[0].price = 1_250_000;
    let large = RuleBasedChecker::default().decide(&stock(), &fresh);
    assert!(large.should_update);
    assert_eq!(
        large.changes,
        vec![ListingChange::Price {
            id: "1".to_string(),
            from: 1_385_000,
            to: 1_250_000
        }]
    );
}

#[test]
fn test_extreme_stored_prices_are_price_changes() {
    let current = vec![listing("1", -1)];
    let fresh = vec![listing("1", i64::MAX)];

    let decision = RuleBasedChecker::default().decide(&current, &fresh);
    assert!(decision.should_update);
    assert_eq!(
        decision.changes,
        vec![ListingChange::Price {
            id: "1".to_string(),
            from: -1,
            to: i64::MAX
        }]
    );
}

#[test]
fn test_custom_threshold() {
    let checker = RuleBasedChecker::new(ConsistencyRules {
        price_change_percent: 20.0,
        ..ConsistencyRules::default()
    });
    let mut fresh = stock();
    fresh[1].price = 500_000;

    assert!(!checker.decide(&stock(), &fresh).should_update);
}

#[test]
fn test_title_and_image_noise_is_cosmetic() {
    let mut fresh = stock();
    fresh[2].title = "  İLAN 3 ".to_string();
    fresh[3].image_urls = vec!["https://example.com/b.avif".to_string()];

    let decision = RuleBasedChecker::default().decide(&stock(), &fresh);
    assert!(!decision.should_update);
    assert_eq!(decision.changes.len(), 2);
    assert!(decision.reason.starts_with("Only cosmetic changes"));
}

#[test]
fn test_spec_and_expertise_changes_update() {
    let mut current = stock();
    current[0].expertise_report = Some(oto_galeri::ExpertiseReport::original());

    let mut fresh = current.clone();
    fresh[1].km = 180_000;
    fresh[0].expertise_report = Some(
        oto_galeri::ExpertiseReport::original()
            .with_panel(oto_galeri::Panel::Hood, oto_galeri::Condition::Painted),
    );

    let decision = RuleBasedChecker::default().decide(&current, &fresh);
    assert!(decision.should_update);
    assert!(decision
        .changes
        .contains(&ListingChange::Expertise { id: "1".to_string() }));
    assert!(decision.changes.contains(&ListingChange::Specs {
        id: "2".to_string(),
        field: "km".to_string()
    }));
}

#[test]
fn test_missing_report_in_scrape_is_not_a_change() {
    let mut current = stock();
    current[0].expertise_report = Some(oto_galeri::ExpertiseReport::original());

    let decision = RuleBasedChecker::default().decide(&current, &stock());
    assert!(decision.changes.is_empty());
}

#[tokio::test]
async fn test_update_engine_over_json_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let current = JsonFileSource::new(storage.clone(), "listings.json");
    current.write_listings(&stock()).await?;

    let mut scraped = stock();
    scraped[0].price = 1_250_000;
    let fresh = JsonFileSource::new(storage.clone(), "scrape/fresh.json");
    fresh.write_listings(&scraped).await?;

    let engine = UpdateEngine::new(current, fresh, RuleBasedChecker::default());
    let run = engine.run().await?;

    assert!(run.outcome.updated);
    assert_eq!(run.outcome.status, "updated");
    assert_eq!(run.fresh, scraped);
    assert!(run.outcome.reason.contains("1 price"));
    Ok(())
}

#[tokio::test]
async fn test_update_engine_skips_unchanged_inventory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let current = JsonFileSource::new(storage.clone(), "listings.json");
    current.write_listings(&stock()).await?;
    let fresh = JsonFileSource::new(storage, "fresh.json");
    fresh.write_listings(&stock()).await?;

    let run = UpdateEngine::new(current, fresh, RuleBasedChecker::default())
        .run()
        .await?;

    assert!(!run.outcome.updated);
    assert_eq!(run.outcome.status, "skipped");
    Ok(())
}

#[tokio::test]
async fn test_update_engine_propagates_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    let current = JsonFileSource::new(storage.clone(), "listings.json");
    let fresh = JsonFileSource::new(storage, "missing.json");

    let result = UpdateEngine::new(current, fresh, RuleBasedChecker::default())
        .run()
        .await;
    assert!(matches!(result, Err(oto_galeri::GaleriError::IoError(_))));
}
