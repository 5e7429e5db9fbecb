use clap::Parser;
use oto_galeri::config::{ConfiguredSource, OutputFormat, ReportTarget};
use oto_galeri::core::catalog;
use oto_galeri::core::diagram::{BodyDiagram, TopDownDiagram};
use oto_galeri::core::import;
use oto_galeri::core::{ListingSource, ListingStore, Storage};
use oto_galeri::domain::model::ListingDraft;
use oto_galeri::utils::error::ErrorSeverity;
use oto_galeri::utils::{logger, validation::Validate};
use oto_galeri::{
    CliConfig, Command, ExpertiseRenderer, ExpertiseReport, JsonFileSource, Listing,
    LocalStorage, Result, RuleBasedChecker, TomlConfig, UpdateEngine,
};
use serde::Serialize;
use std::collections::HashMap;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting galeri");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ galeri failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2, // worth a retry
            ErrorSeverity::Critical => 3,
            ErrorSeverity::Low | ErrorSeverity::High => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    cli.validate()?;

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    config.validate()?;

    match cli.command {
        Command::Report { target, format } => {
            let format = format.unwrap_or(config.output.format);
            match load_report(&config, &target).await? {
                Some(report) => print_report(&report, format)?,
                None => println!("Ekspertiz bilgisi girilmemiş."),
            }
        }
        Command::Diagram { target, out } => {
            let Some(report) = load_report(&config, &target).await? else {
                println!("Ekspertiz bilgisi girilmemiş.");
                return Ok(());
            };
            let diagram = TopDownDiagram::new();
            let regions = ExpertiseRenderer::new().regions_for(&report);
            let svg = diagram.render_svg(&regions);
            LocalStorage::new(".")
                .write_file(&out, svg.as_bytes())
                .await?;
            tracing::info!("Rendered {} diagram", diagram.name());
            println!("✅ Diagram saved to: {}", out);
        }
        Command::List {
            brand,
            model,
            year,
            min_price,
            max_price,
            format,
        } => {
            let listings = config.listing_source()?.fetch_listings().await?;

            let mut filter = config.default_filter();
            filter.set_brand(brand);
            filter.model = model;
            filter.year = year;
            if let Some(min) = min_price {
                filter.min_price = min;
            }
            if let Some(max) = max_price {
                filter.max_price = max;
            }

            let format = format.unwrap_or(config.output.format);
            if format == OutputFormat::Text {
                let years: Vec<String> =
                    catalog::years(&listings).iter().map(i32::to_string).collect();
                println!("Markalar: {}", catalog::brands(&listings).join(", "));
                println!(
                    "Modeller: {}",
                    catalog::models(&listings, filter.brand.as_deref()).join(", ")
                );
                println!("Yıllar:   {}", years.join(", "));
                println!();
            }

            let selected = filter.apply(&listings);
            print_listings(&selected, format)?;
        }
        Command::Add { fields } => {
            let mut draft = ListingDraft::empty();
            fields.apply_to(&mut draft);
            let listing = config.listing_source()?.create_listing(&draft).await?;
            println!("✅ İlan eklendi: {} ({})", listing.title, listing.id);
        }
        Command::Edit { id, fields } => {
            let store = config.listing_source()?;
            let current = store.fetch_listing(&id).await?;

            let mut draft = ListingDraft::from(&current);
            fields.apply_to(&mut draft);
            let listing = store.update_listing(&id, &draft).await?;

            println!("✅ İlan güncellendi: {} ({})", listing.title, listing.id);
            if let Some(report) = &listing.expertise_report {
                print_report(report, OutputFormat::Text)?;
            }
        }
        Command::Delete { id } => {
            config.listing_source()?.delete_listing(&id).await?;
            println!("🗑️  İlan silindi: {}", id);
        }
        Command::Import { input, out, upsert } => {
            let json = tokio::fs::read_to_string(&input).await?;
            let batch = import::import_scraped(&json)?;

            if let Some(out) = out {
                let data = serde_json::to_vec_pretty(&batch.rows)?;
                LocalStorage::new(".").write_file(&out, &data).await?;
                println!("📁 Rows saved to: {}", out);
            }
            if upsert {
                let written = config.supabase_client()?.upsert_external(&batch.rows).await?;
                println!("✅ Upserted {} listings", written);
            }
            println!(
                "{} rows, {} skipped, {} without price",
                batch.rows.len(),
                batch.skipped,
                batch.unpriced
            );
        }
        Command::Check { fresh, write } => {
            let current = config.listing_source()?;
            let engine = UpdateEngine::new(
                current.clone(),
                JsonFileSource::new(LocalStorage::new("."), fresh),
                RuleBasedChecker::new(config.consistency.clone()),
            );
            let run = engine.run().await?;
            println!("{}", serde_json::to_string_pretty(&run.outcome)?);

            if write && run.outcome.updated {
                match current {
                    ConfiguredSource::File(source) => {
                        source.write_listings(&run.fresh).await?;
                        println!("📁 Listings saved to: {}", source.path().display());
                    }
                    ConfiguredSource::Supabase(_) => {
                        tracing::warn!("--write only applies to a file source; store left untouched");
                    }
                }
            }
        }
    }

    Ok(())
}

async fn load_report(config: &TomlConfig, target: &ReportTarget) -> Result<Option<ExpertiseReport>> {
    if let Some(path) = &target.file {
        let data = tokio::fs::read(path).await?;
        let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(&data)?;
        let normalized = ExpertiseReport::normalize_json(raw);
        if !normalized.is_clean() {
            eprintln!(
                "⚠️  {} unknown panel key(s), {} unrecognized status value(s) read as Orijinal",
                normalized.ignored_keys.len(),
                normalized.coerced.len()
            );
        }
        return Ok(Some(normalized.report));
    }

    let id = target.listing.as_deref().unwrap_or_default();
    let listing = config.listing_source()?.fetch_listing(id).await?;
    Ok(listing.expertise_report)
}

fn print_report(report: &ExpertiseReport, format: OutputFormat) -> Result<()> {
    let renderer = ExpertiseRenderer::new();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&renderer.render(report))?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for region in renderer.regions_for(report) {
                wtr.write_record([
                    region.panel.label(),
                    region.condition.label(),
                    region.color.css_class(),
                ])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Text => {
            println!("Ekspertiz Raporu");
            if report.is_fully_original() {
                println!("Tamamen Orijinal: bu araçta boyalı veya değişen parça bulunmamaktadır.");
            } else {
                for line in renderer.summary_lines(report) {
                    println!("  {:<20} {}", line.panel_label, line.condition_label);
                }
            }
            let legend: Vec<&str> = renderer.legend().iter().map(|e| e.label).collect();
            println!("Lejant: {}", legend.join(" / "));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CatalogRow<'a> {
    id: &'a str,
    title: &'a str,
    brand: &'a str,
    model: &'a str,
    year: i32,
    price: i64,
    km: i64,
    expertise: String,
}

impl<'a> From<&'a Listing> for CatalogRow<'a> {
    fn from(listing: &'a Listing) -> Self {
        let expertise = match &listing.expertise_report {
            None => "-".to_string(),
            Some(report) => report.worst_condition().label().to_string(),
        };
        Self {
            id: &listing.id,
            title: &listing.title,
            brand: &listing.brand,
            model: &listing.model,
            year: listing.year,
            price: listing.price,
            km: listing.km,
            expertise,
        }
    }
}

fn print_listings(listings: &[&Listing], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(listings)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for listing in listings {
                wtr.serialize(CatalogRow::from(*listing))?;
            }
            wtr.flush()?;
        }
        OutputFormat::Text => {
            if listings.is_empty() {
                println!("Aradığınız kriterlere uygun araç bulunamadı.");
            }
            for listing in listings {
                let row = CatalogRow::from(*listing);
                println!(
                    "{:<12} {:<10} {:<20} {:>4} {:>10} TL {:>8} km  {}",
                    row.id, row.brand, row.model, row.year, row.price, row.km, row.title
                );
            }
            tracing::info!("{} listings shown", listings.len());
        }
    }
    Ok(())
}
