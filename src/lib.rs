pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::cli::{JsonFileSource, LocalStorage};
pub use config::supabase::SupabaseClient;
pub use config::toml_config::TomlConfig;
pub use core::{
    consistency::RuleBasedChecker,
    renderer::{ColorToken, ExpertiseRenderer},
    updater::UpdateEngine,
};
pub use domain::expertise::{Condition, ExpertiseReport, Panel};
pub use domain::model::Listing;
pub use utils::error::{GaleriError, Result};
