//! Property catalog client
//!
//! Browse, filter and paginate real-estate listings served by a REST
//! backend, view one listing, and create new ones.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod render;

pub use config::AppConfig;
pub use error::{CatalogError, Result};
pub use models::{NewProperty, Property};
