use crate::config::cli::{JsonFileSource, LocalStorage};
use crate::config::supabase::SupabaseClient;
use crate::config::{ConfiguredSource, OutputFormat};
use crate::core::catalog::{ListingFilter, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};
use crate::core::consistency::ConsistencyRules;
use crate::utils::error::{GaleriError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub consistency: ConsistencyRules,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    File,
    Supabase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub r#type: SourceType,
    /// Listings JSON file, relative to the working directory.
    pub path: String,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            r#type: SourceType::File,
            path: "listings.json".to_string(),
            url: None,
            api_key: None,
            table: "listings".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub min_price: i64,
    pub max_price: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GaleriError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GaleriError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as-is
    /// so validation can name them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.source.r#type {
            SourceType::File => validation::validate_path("source.path", &self.source.path)?,
            SourceType::Supabase => {
                let url = validation::validate_required_field("source.url", &self.source.url)?;
                validation::validate_url("source.url", url)?;
                let key =
                    validation::validate_required_field("source.api_key", &self.source.api_key)?;
                if key.contains("${") {
                    return Err(GaleriError::InvalidConfigValueError {
                        field: "source.api_key".to_string(),
                        value: key.clone(),
                        reason: "environment variable is not set".to_string(),
                    });
                }
                if self.source.table.trim().is_empty() {
                    return Err(GaleriError::MissingConfigError {
                        field: "source.table".to_string(),
                    });
                }
            }
        }

        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 300)?;

        if self.catalog.min_price > self.catalog.max_price {
            return Err(GaleriError::InvalidConfigValueError {
                field: "catalog.min_price".to_string(),
                value: self.catalog.min_price.to_string(),
                reason: format!("must not exceed catalog.max_price ({})", self.catalog.max_price),
            });
        }

        validation::validate_range(
            "consistency.price_change_percent",
            self.consistency.price_change_percent,
            0.0,
            100.0,
        )?;
        validation::validate_range(
            "consistency.max_removed_ratio",
            self.consistency.max_removed_ratio,
            0.0,
            1.0,
        )?;

        Ok(())
    }

    /// Catalog defaults with the configured price bounds.
    pub fn default_filter(&self) -> ListingFilter {
        ListingFilter {
            min_price: self.catalog.min_price,
            max_price: self.catalog.max_price,
            ..ListingFilter::default()
        }
    }

    pub fn listing_source(&self) -> Result<ConfiguredSource> {
        match self.source.r#type {
            SourceType::File => Ok(ConfiguredSource::File(JsonFileSource::new(
                LocalStorage::new("."),
                self.source.path.clone(),
            ))),
            SourceType::Supabase => Ok(ConfiguredSource::Supabase(self.supabase_client()?)),
        }
    }

    pub fn supabase_client(&self) -> Result<SupabaseClient> {
        let url = validation::validate_required_field("source.url", &self.source.url)?;
        let key = validation::validate_required_field("source.api_key", &self.source.api_key)?;
        SupabaseClient::new(url.clone(), key.clone())
            .with_table(self.source.table.clone())
            .with_timeout(self.source.timeout_seconds)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
