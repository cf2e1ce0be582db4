//! Scripted backend for driving the browse core in tests

use crate::catalog::memory::InMemoryPropertyService;
use crate::catalog::traits::PropertyService;
use crate::catalog::types::FilterQuery;
use crate::error::{CatalogError, Result};
use crate::models::{NewProperty, Property};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// `count` listings named `"{prefix} 1"`, `"{prefix} 2"`, ...
pub fn numbered(prefix: &str, count: usize) -> Vec<Property> {
    (1..=count)
        .map(|i| Property {
            id: format!("{}-{}", prefix.to_lowercase(), i),
            owner_id: "owner".to_string(),
            name: format!("{} {}", prefix, i),
            address: format!("Calle {} # 10-{}", i, i),
            price: 100_000_000 * i as i64,
            image_url: format!("https://example.com/{}.jpg", i),
        })
        .collect()
}

/// In-memory backend with per-name latency and failures
///
/// Scripts are keyed by the query's name filter (`""` when absent).
pub struct ScriptedService {
    backing: InMemoryPropertyService,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashSet<String>>,
    calls: Mutex<Vec<FilterQuery>>,
}

impl ScriptedService {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            backing: InMemoryPropertyService::new(properties),
            delays: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn delay_for(&self, name: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(name.to_string(), delay);
    }

    pub fn fail_for(&self, name: &str) {
        self.failures.lock().unwrap().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<FilterQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PropertyService for ScriptedService {
    async fn list(&self, query: &FilterQuery) -> Result<Vec<Property>> {
        self.calls.lock().unwrap().push(query.clone());
        let key = query.name.clone().unwrap_or_default();

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failures.lock().unwrap().contains(&key) {
            return Err(CatalogError::Status {
                status: 500,
                message: "backend exploded".to_string(),
            });
        }
        self.backing.list(query).await
    }

    async fn create(&self, property: &NewProperty) -> Result<Property> {
        self.backing.create(property).await
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
