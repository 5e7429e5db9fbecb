use oto_galeri::core::import::import_scraped;
use oto_galeri::GaleriError;

#[test]
fn test_import_scraped_export() {
    let json = r#"[
        {"sahibindenId": "1283399946", "title": " SAFKAN BENZİNLİ ", "price": "319.900 TL",
         "model": "1.4 Classic", "year": "1999", "km": "298.500",
         "imageUrl": "https://i0.shbdn.com/a.avif", "link": "https://www.sahibinden.com/ilan/1283399946"},
        {"sahibindenId": "1286367961", "title": "EMSALSİZ AUDİ", "price": "Fiyat sorunuz",
         "model": "A4", "year": "2006", "km": "-", "imageUrl": "", "link": ""}
    ]"#;

    let batch = import_scraped(json).unwrap();

    assert_eq!(batch.rows.len(), 2);
    assert_eq!(batch.skipped, 0);
    assert_eq!(batch.unpriced, 1);

    let first = &batch.rows[0];
    assert_eq!(first.sahibinden_id, "1283399946");
    assert_eq!(first.title, "SAFKAN BENZİNLİ");
    assert_eq!(first.price, 319_900);
    assert_eq!(first.year, Some(1999));
    assert_eq!(first.km, Some(298_500));
    assert_eq!(first.original_link, "https://www.sahibinden.com/ilan/1283399946");

    let second = &batch.rows[1];
    assert_eq!(second.price, 0);
    assert_eq!(second.km, None);
}

#[test]
fn test_import_skips_items_without_id_and_dedups() {
    let json = r#"[
        {"sahibindenId": "", "title": "no id", "price": "100 TL"},
        {"sahibindenId": "42", "title": "first", "price": "100 TL"},
        {"sahibindenId": "42", "title": "second", "price": "90 TL"}
    ]"#;

    let batch = import_scraped(json).unwrap();

    assert_eq!(batch.skipped, 1);
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].title, "second");
    assert_eq!(batch.rows[0].price, 90);
}

#[test]
fn test_import_rejects_non_array() {
    let result = import_scraped(r#"{"sahibindenId": "1"}"#);
    assert!(matches!(result, Err(GaleriError::ImportError { .. })));
}

#[test]
fn test_import_rejects_invalid_json() {
    let result = import_scraped("not json");
    assert!(matches!(result, Err(GaleriError::SerializationError(_))));
}

#[test]
fn test_rows_serialize_with_table_columns() {
    let batch =
        import_scraped(r#"[{"sahibindenId": "7", "title": "t", "price": "1.000 TL"}]"#).unwrap();
    let value = serde_json::to_value(&batch.rows[0]).unwrap();

    assert_eq!(value["sahibinden_id"], "7");
    assert_eq!(value["price"], 1000);
    assert!(value.get("original_link").is_some());
}

#[test]
fn test_price_with_trailing_text_keeps_leading_amount() {
    let batch = import_scraped(
        r#"[{"sahibindenId": "8", "title": "t", "price": "1.385.000 TL'den başlayan"}]"#,
    )
    .unwrap();

    assert_eq!(batch.rows[0].price, 1_385_000);
    assert_eq!(batch.unpriced, 0);
}
