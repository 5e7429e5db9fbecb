use crate::domain::model::ListingDraft;
use crate::utils::error::{GaleriError, Result};
use chrono::Datelike;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GaleriError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GaleriError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GaleriError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GaleriError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GaleriError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GaleriError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GaleriError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn validate_min_chars(field_name: &str, value: &str, min: usize, message: &str) -> Result<()> {
    if value.trim().chars().count() < min {
        return Err(GaleriError::ValidationError {
            field: field_name.to_string(),
            message: message.to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative(field_name: &str, value: i64, message: &str) -> Result<()> {
    if value < 0 {
        return Err(GaleriError::ValidationError {
            field: field_name.to_string(),
            message: message.to_string(),
        });
    }
    Ok(())
}

/// Same rules as the admin listing form. Messages are shown to the admin as-is.
impl Validate for ListingDraft {
    fn validate(&self) -> Result<()> {
        validate_min_chars("title", &self.title, 5, "Başlık en az 5 karakter olmalıdır.")?;
        validate_min_chars("brand", &self.brand, 2, "Marka alanı zorunludur.")?;
        validate_min_chars("model", &self.model, 1, "Model alanı zorunludur.")?;

        let max_year = chrono::Local::now().year() + 1;
        if self.year < 1900 || self.year > max_year {
            return Err(GaleriError::ValidationError {
                field: "year".to_string(),
                message: "Geçerli bir yıl girin.".to_string(),
            });
        }

        validate_non_negative("price", self.price, "Fiyat negatif olamaz.")?;
        validate_non_negative("km", self.km, "Kilometre negatif olamaz.")?;
        Ok(())
    }
}
