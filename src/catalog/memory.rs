use crate::catalog::traits::PropertyService;
use crate::catalog::types::FilterQuery;
use crate::error::Result;
use crate::models::{NewProperty, Property};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, info};

/// Property backend kept in process memory
///
/// Applies the same filters the REST backend does: case-insensitive
/// substring match on name and address, inclusive price bounds.
pub struct InMemoryPropertyService {
    properties: Mutex<Vec<Property>>,
    next_id: Mutex<u64>,
}

impl InMemoryPropertyService {
    pub fn new(properties: Vec<Property>) -> Self {
        let next_id = properties.len() as u64 + 1;
        Self {
            properties: Mutex::new(properties),
            next_id: Mutex::new(next_id),
        }
    }

    /// Backend preloaded with a handful of sample listings
    pub fn with_sample_data() -> Self {
        info!("📋 Loading sample catalog");
        Self::new(sample_properties())
    }

    pub fn len(&self) -> usize {
        self.properties
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPropertyService {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Whether a property satisfies every criterion in the query
pub fn matches(property: &Property, query: &FilterQuery) -> bool {
    let contains = |haystack: &str, needle: &Option<String>| match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    };

    contains(&property.name, &query.name)
        && contains(&property.address, &query.address)
        && query.min_price.map_or(true, |min| property.price >= min)
        && query.max_price.map_or(true, |max| property.price <= max)
}

#[async_trait]
impl PropertyService for InMemoryPropertyService {
    async fn list(&self, query: &FilterQuery) -> Result<Vec<Property>> {
        let properties = self
            .properties
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let found: Vec<Property> = properties
            .into_iter()
            .filter(|p| matches(p, query))
            .collect();
        debug!("In-memory catalog matched {} properties", found.len());
        Ok(found)
    }

    async fn create(&self, property: &NewProperty) -> Result<Property> {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            let id = *next;
            *next += 1;
            id
        };
        let created = property.clone().with_id(format!("local-{}", id));
        self.properties
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(created.clone());
        info!("Created property {}", created.id);
        Ok(created)
    }

    fn source_name(&self) -> &'static str {
        "in-memory"
    }
}

fn sample(id: &str, name: &str, address: &str, price: i64) -> Property {
    Property {
        id: id.to_string(),
        owner_id: "656f81e92f1a4c3a9c2b4678".to_string(),
        name: name.to_string(),
        address: address.to_string(),
        price,
        image_url: format!("https://images.example.com/{}.jpg", id),
    }
}

/// Sample listings for offline browsing
pub fn sample_properties() -> Vec<Property> {
    vec![
        sample("sample-1", "Casa Campestre La Calera", "Vereda El Salitre km 3", 1_450_000_000),
        sample("sample-2", "Apartamento Chapinero", "Calle 57 # 45-22", 620_000_000),
        sample("sample-3", "Casa Colonial", "Carrera 2 # 12-40", 2_300_000_000),
        sample("sample-4", "Penthouse Rosales", "Calle 72 # 1-15", 4_100_000_000),
        sample("sample-5", "Casa en Usaquén", "Carrera 6 # 119-24", 980_000_000),
        sample("sample-6", "Loft Centro", "Avenida Jiménez # 4-80", 310_000_000),
        sample("sample-7", "Casa Quinta Chía", "Vía Chía - Cajicá km 2", 1_750_000_000),
    ]
}
