use serde::{Deserialize, Serialize};

/// Lowest price the range filter can express
pub const PRICE_FLOOR: i64 = 50_000_000;
/// Highest price the range filter can express
pub const PRICE_CEILING: i64 = 5_000_000_000;

/// Canonical, settled filter criteria for one collection read
///
/// Replaced wholesale on every settled edit and compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterQuery {
    /// Substring match on the property name
    pub name: Option<String>,
    /// Substring match on the address
    pub address: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<i64>,
    /// Inclusive upper price bound
    pub max_price: Option<i64>,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            name: None,
            address: None,
            min_price: Some(PRICE_FLOOR),
            max_price: Some(PRICE_CEILING),
        }
    }
}

impl FilterQuery {
    /// Build a query, treating empty text as "no filter"
    pub fn new(name: &str, address: &str, min_price: i64, max_price: i64) -> Self {
        Self {
            name: non_empty(name),
            address: non_empty(address),
            min_price: Some(min_price),
            max_price: Some(max_price),
        }
    }

    /// Request parameters; absent fields are left out entirely
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            params.push(("name", name.to_string()));
        }
        if let Some(address) = self.address.as_deref().filter(|s| !s.is_empty()) {
            params.push(("address", address.to_string()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.to_string()));
        }
        params
    }

    /// True when the text criteria (name or address) differ from `other`
    pub fn text_differs(&self, other: &FilterQuery) -> bool {
        self.name != other.name || self.address != other.address
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_empty_text_fields() {
        let query = FilterQuery::new("Casa", "", 50_000_000, 5_000_000_000);
        assert_eq!(
            query.to_params(),
            vec![
                ("name", "Casa".to_string()),
                ("minPrice", "50000000".to_string()),
                ("maxPrice", "5000000000".to_string()),
            ]
        );
    }

    #[test]
    fn omits_absent_prices() {
        let query = FilterQuery {
            name: None,
            address: Some("Calle 1".to_string()),
            min_price: None,
            max_price: None,
        };
        assert_eq!(query.to_params(), vec![("address", "Calle 1".to_string())]);
    }

    #[test]
    fn text_difference_ignores_prices() {
        let a = FilterQuery::new("Casa", "", PRICE_FLOOR, PRICE_CEILING);
        let b = FilterQuery::new("Casa", "", 100_000_000, PRICE_CEILING);
        let c = FilterQuery::new("Casa", "Calle", PRICE_FLOOR, PRICE_CEILING);

        assert_ne!(a, b);
        assert!(!a.text_differs(&b));
        assert!(a.text_differs(&c));
    }
}
