use anyhow::Result;
use oto_galeri::domain::expertise::PanelEdit;
use oto_galeri::domain::model::ListingDraft;
use oto_galeri::domain::ports::{ListingSource, ListingStore};
use oto_galeri::{Condition, GaleriError, JsonFileSource, LocalStorage, Panel};
use tempfile::TempDir;

fn draft(title: &str) -> ListingDraft {
    let mut draft = ListingDraft::empty();
    draft.title = title.to_string();
    draft.brand = "Volkswagen".to_string();
    draft.model = "Passat 1.6 TDI".to_string();
    draft.year = 2017;
    draft.price = 1_385_000;
    draft.km = 172_000;
    draft
}

#[tokio::test]
async fn test_create_into_missing_file_assigns_ids() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileSource::new(LocalStorage::new(temp_dir.path()), "listings.json");

    let first = store.create_listing(&draft("Temiz aile aracı")).await?;
    let second = store.create_listing(&draft("Hatasız boyasız")).await?;

    assert_eq!(first.id, "1");
    assert_eq!(second.id, "2");
    assert_eq!(store.fetch_listings().await?, vec![first, second]);
    Ok(())
}

#[tokio::test]
async fn test_invalid_draft_is_not_written() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileSource::new(LocalStorage::new(temp_dir.path()), "listings.json");

    let result = store.create_listing(&draft("Golf")).await;

    match result {
        Err(GaleriError::ValidationError { field, message }) => {
            assert_eq!(field, "title");
            assert_eq!(message, "Başlık en az 5 karakter olmalıdır.");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!temp_dir.path().join("listings.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_edit_flow_updates_panels_and_keeps_id() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileSource::new(LocalStorage::new(temp_dir.path()), "listings.json");
    let created = store.create_listing(&draft("Temiz aile aracı")).await?;

    let edits: Vec<PanelEdit> = vec!["Kaput=Boyalı".parse()?, "Sol Ön Kapı=Değişen".parse()?];
    let mut edited = ListingDraft::from(&created);
    edited.price = 1_250_000;
    edited.expertise_report = edited.expertise_report.with_edits(&edits);

    let updated = store.update_listing(&created.id, &edited).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.price, 1_250_000);

    let stored = std::fs::read_to_string(temp_dir.path().join("listings.json"))?;
    let rows: serde_json::Value = serde_json::from_str(&stored)?;
    let report = rows[0]["expertise_report"].as_object().expect("report object");
    assert_eq!(report.len(), Panel::COUNT);
    assert_eq!(report["Kaput"], "Boyalı");
    assert_eq!(report["Sol Ön Kapı"], "Değişen");
    assert_eq!(report["Tavan"], "Orijinal");

    let reloaded = store.fetch_listings().await?;
    let reloaded_report = reloaded[0].expertise_report.expect("report present");
    assert_eq!(reloaded_report[Panel::Hood], Condition::Painted);
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete_unknown_id() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileSource::new(LocalStorage::new(temp_dir.path()), "listings.json");
    store.create_listing(&draft("Temiz aile aracı")).await?;

    let update = store.update_listing("99", &draft("Temiz aile aracı")).await;
    assert!(matches!(update, Err(GaleriError::NotFound { ref id }) if id == "99"));

    let delete = store.delete_listing("99").await;
    assert!(matches!(delete, Err(GaleriError::NotFound { .. })));
    Ok(())
}

#[tokio::test]
async fn test_delete_removes_only_that_listing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = JsonFileSource::new(LocalStorage::new(temp_dir.path()), "listings.json");
    let first = store.create_listing(&draft("Temiz aile aracı")).await?;
    let second = store.create_listing(&draft("Hatasız boyasız")).await?;

    store.delete_listing(&first.id).await?;

    assert_eq!(store.fetch_listings().await?, vec![second]);
    let third = store.create_listing(&draft("Düşük kilometreli")).await?;
    assert_eq!(third.id, "3");
    Ok(())
}

#[tokio::test]
async fn test_configured_file_source_writes_through() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = oto_galeri::config::ConfiguredSource::File(JsonFileSource::new(
        LocalStorage::new(temp_dir.path()),
        "stock.json",
    ));

    let created = source.create_listing(&draft("Temiz aile aracı")).await?;
    assert_eq!(source.fetch_listing(&created.id).await?, created);

    source.delete_listing(&created.id).await?;
    assert!(source.fetch_listings().await?.is_empty());
    Ok(())
}
