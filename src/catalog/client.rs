use crate::catalog::traits::PropertyService;
use crate::catalog::types::FilterQuery;
use crate::config::AppConfig;
use crate::error::{CatalogError, Result};
use crate::models::{NewProperty, Property};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// REST implementation of the property backend
pub struct HttpPropertyService {
    client: Client,
    base_url: String,
}

impl HttpPropertyService {
    /// Create a client for the backend named in the configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(format!("{}/{}", config.app.name, config.app.version))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection read endpoint (trailing slash matches the backend route)
    fn collection_url(&self) -> String {
        format!("{}/Property/", self.base_url)
    }

    /// Creation endpoint
    fn create_url(&self) -> String {
        format!("{}/Property", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned status: {}", status);
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        debug!("Downloaded {} bytes of JSON", body.len());
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PropertyService for HttpPropertyService {
    async fn list(&self, query: &FilterQuery) -> Result<Vec<Property>> {
        let url = self.collection_url();
        let params = query.to_params();
        debug!("Fetching URL: {} with {:?}", url, params);

        let response = self.client.get(&url).query(&params).send().await?;
        let properties: Vec<Property> = Self::decode(response).await?;

        info!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    async fn create(&self, property: &NewProperty) -> Result<Property> {
        let url = self.create_url();
        debug!("Posting new property to {}", url);

        let response = self.client.post(&url).json(property).send().await?;
        let created: Property = Self::decode(response).await?;

        info!("Created property {}", created.id);
        Ok(created)
    }

    fn source_name(&self) -> &'static str {
        "HTTP"
    }
}
