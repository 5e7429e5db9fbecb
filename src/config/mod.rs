pub mod cli;
pub mod supabase;
pub mod toml_config;

use crate::config::cli::{JsonFileSource, LocalStorage};
use crate::config::supabase::SupabaseClient;
use crate::core::{Listing, ListingSource, ListingStore};
use crate::domain::model::ListingDraft;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// The listing store picked by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    File(JsonFileSource<LocalStorage>),
    Supabase(SupabaseClient),
}

impl ConfiguredSource {
    pub async fn fetch_listing(&self, id: &str) -> Result<Listing> {
        match self {
            Self::Supabase(client) => client.fetch_listing(id).await,
            Self::File(source) => source
                .fetch_listings()
                .await?
                .into_iter()
                .find(|l| l.id == id)
                .ok_or_else(|| crate::utils::error::GaleriError::NotFound { id: id.to_string() }),
        }
    }
}

impl ListingSource for ConfiguredSource {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        match self {
            Self::File(source) => source.fetch_listings().await,
            Self::Supabase(client) => client.fetch_listings().await,
        }
    }
}

impl ListingStore for ConfiguredSource {
    async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing> {
        match self {
            Self::File(source) => source.create_listing(draft).await,
            Self::Supabase(client) => client.create_listing(draft).await,
        }
    }

    async fn update_listing(&self, id: &str, draft: &ListingDraft) -> Result<Listing> {
        match self {
            Self::File(source) => source.update_listing(id, draft).await,
            Self::Supabase(client) => client.update_listing(id, draft).await,
        }
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        match self {
            Self::File(source) => source.delete_listing(id).await,
            Self::Supabase(client) => client.delete_listing(id).await,
        }
    }
}

#[cfg(feature = "cli")]
pub use self::args::{CliConfig, Command, ListingFields, ReportTarget};

#[cfg(feature = "cli")]
mod args {
    use super::OutputFormat;
    use crate::domain::expertise::PanelEdit;
    use crate::domain::model::ListingDraft;
    use crate::utils::error::{GaleriError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::{Args, Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "galeri")]
    #[command(about = "Showroom listing and expertise report tool")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(long, global = true)]
        pub config: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    /// Where an expertise report comes from.
    #[derive(Debug, Clone, Args)]
    #[group(required = true, multiple = false)]
    pub struct ReportTarget {
        /// Listing id in the configured store
        #[arg(long)]
        pub listing: Option<String>,

        /// JSON file holding a stored report object
        #[arg(long)]
        pub file: Option<String>,
    }

    /// Listing fields set from the command line. Unset fields keep their value.
    #[derive(Debug, Clone, Default, Args)]
    pub struct ListingFields {
        #[arg(long)]
        pub title: Option<String>,
        #[arg(long)]
        pub brand: Option<String>,
        #[arg(long)]
        pub model: Option<String>,
        #[arg(long)]
        pub year: Option<i32>,
        #[arg(long)]
        pub price: Option<i64>,
        #[arg(long)]
        pub km: Option<i64>,
        #[arg(long)]
        pub description: Option<String>,
        /// Image URL; repeat for several. Replaces the existing images when given.
        #[arg(long = "image", value_name = "URL")]
        pub images: Vec<String>,
        /// Expertise edit such as "Kaput=Boyalı"; repeat for several panels
        #[arg(long = "set", value_name = "PANEL=STATUS")]
        pub set: Vec<PanelEdit>,
    }

    impl ListingFields {
        pub fn apply_to(self, draft: &mut ListingDraft) {
            if let Some(title) = self.title {
                draft.title = title;
            }
            if let Some(brand) = self.brand {
                draft.brand = brand;
            }
            if let Some(model) = self.model {
                draft.model = model;
            }
            if let Some(year) = self.year {
                draft.year = year;
            }
            if let Some(price) = self.price {
                draft.price = price;
            }
            if let Some(km) = self.km {
                draft.km = km;
            }
            if self.description.is_some() {
                draft.description = self.description;
            }
            if !self.images.is_empty() {
                draft.image_urls = self.images;
            }
            draft.expertise_report = draft.expertise_report.with_edits(&self.set);
        }
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Add a listing to the configured store
        Add {
            #[command(flatten)]
            fields: ListingFields,
        },
        /// Change fields or expertise panels of a stored listing
        Edit {
            id: String,
            #[command(flatten)]
            fields: ListingFields,
        },
        /// Remove a listing from the configured store
        Delete { id: String },
        /// Print the expertise summary of a listing or report file
        Report {
            #[command(flatten)]
            target: ReportTarget,
            #[arg(long, value_enum)]
            format: Option<OutputFormat>,
        },
        /// Write the body diagram of a report as SVG
        Diagram {
            #[command(flatten)]
            target: ReportTarget,
            #[arg(long)]
            out: String,
        },
        /// List inventory with the catalog filter
        List {
            #[arg(long)]
            brand: Option<String>,
            #[arg(long)]
            model: Option<String>,
            #[arg(long)]
            year: Option<i32>,
            #[arg(long)]
            min_price: Option<i64>,
            #[arg(long)]
            max_price: Option<i64>,
            #[arg(long, value_enum)]
            format: Option<OutputFormat>,
        },
        /// Convert a Sahibinden scrape export into external listing rows
        Import {
            input: String,
            #[arg(long)]
            out: Option<String>,
            /// Upsert the rows into the configured store
            #[arg(long)]
            upsert: bool,
        },
        /// Check whether a fresh scrape differs meaningfully from the stored listings
        Check {
            #[arg(long)]
            fresh: String,
            /// Replace the listings file with the fresh data when the check says so
            #[arg(long)]
            write: bool,
        },
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(path) = &self.config {
                validation::validate_path("config", path)?;
            }

            match &self.command {
                Command::Diagram { out, .. } => validation::validate_path("out", out)?,
                Command::Import { input, out, .. } => {
                    validation::validate_path("input", input)?;
                    if let Some(out) = out {
                        validation::validate_path("out", out)?;
                    }
                }
                Command::Check { fresh, .. } => validation::validate_path("fresh", fresh)?,
                Command::List {
                    min_price: Some(min),
                    max_price: Some(max),
                    ..
                } if min > max => {
                    return Err(GaleriError::InvalidConfigValueError {
                        field: "min_price".to_string(),
                        value: min.to_string(),
                        reason: format!("must not exceed max_price ({})", max),
                    });
                }
                _ => {}
            }
            Ok(())
        }
    }

}
