use crate::catalog::types::FilterQuery;
use crate::error::Result;
use crate::models::{NewProperty, Property};
use async_trait::async_trait;

/// Backend holding the property collection
/// This lets the browsing core run against HTTP or an in-memory fixture
#[async_trait]
pub trait PropertyService: Send + Sync {
    /// Read every property matching the query, in backend order
    async fn list(&self, query: &FilterQuery) -> Result<Vec<Property>>;

    /// Create exactly one property and return it with its assigned id
    async fn create(&self, property: &NewProperty) -> Result<Property>;

    /// Get the name of the backend
    fn source_name(&self) -> &'static str;
}
