//! Local checks for the property creation form
//!
//! A form that fails any check is never sent to the backend.

use crate::catalog::traits::PropertyService;
use crate::error::{CatalogError, Result};
use crate::models::{NewProperty, Property};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_ADDRESS_LEN: usize = 5;
pub const MIN_PRICE: i64 = 100_000;

/// Owner id used when the form leaves it blank
pub const DEFAULT_OWNER_ID: &str = "656f81e92f1a4c3a9c2b4678";

static IMAGE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.+").expect("valid regex"));

/// Raw values from the creation form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePropertyForm {
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub price: i64,
    pub image_url: String,
}

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every failing field of a submission, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message attached to a field, if it failed
    pub fn for_field(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl CreatePropertyForm {
    /// Check every field and build the payload
    ///
    /// # Errors
    ///
    /// Returns all failing fields at once, not just the first.
    pub fn validate(&self) -> std::result::Result<NewProperty, ValidationErrors> {
        let mut errors = Vec::new();

        if self.name.trim().chars().count() < MIN_NAME_LEN {
            errors.push(FieldError {
                field: "name",
                message: "Name must be at least 3 characters",
            });
        }
        if self.address.trim().chars().count() < MIN_ADDRESS_LEN {
            errors.push(FieldError {
                field: "address",
                message: "Address is too short",
            });
        }
        if self.price < MIN_PRICE {
            errors.push(FieldError {
                field: "price",
                message: "Minimum price is $100,000",
            });
        }
        if !IMAGE_URL.is_match(&self.image_url) {
            errors.push(FieldError {
                field: "image_url",
                message: "Enter a valid URL",
            });
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let owner_id = if self.owner_id.trim().is_empty() {
            DEFAULT_OWNER_ID.to_string()
        } else {
            self.owner_id.clone()
        };

        Ok(NewProperty {
            owner_id,
            name: self.name.clone(),
            address: self.address.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
        })
    }
}

/// Validate the form and, only if it passes, send one creation request
pub async fn create_property<S>(service: &S, form: &CreatePropertyForm) -> Result<Property>
where
    S: PropertyService + ?Sized,
{
    let payload = form.validate().map_err(|errors| {
        warn!("Creation form rejected: {}", errors);
        CatalogError::Validation(errors)
    })?;

    let created = service.create(&payload).await?;
    info!("✅ Property {} created via {}", created.id, service.source_name());
    Ok(created)
}
