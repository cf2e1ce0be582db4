use serde::{Deserialize, Serialize};

/// One property listing as served by the catalog backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Property {
    pub id: String,
    #[serde(rename = "idOwner")]
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "addressProperty")]
    pub address: String,
    #[serde(rename = "priceProperty")]
    pub price: i64,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Creation payload: a property without its server-assigned id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProperty {
    #[serde(rename = "idOwner")]
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "addressProperty")]
    pub address: String,
    #[serde(rename = "priceProperty")]
    pub price: i64,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl NewProperty {
    /// Attach the id the backend assigned
    pub fn with_id(self, id: impl Into<String>) -> Property {
        Property {
            id: id.into(),
            owner_id: self.owner_id,
            name: self.name,
            address: self.address,
            price: self.price,
            image_url: self.image_url,
        }
    }
}

/// Format a price with comma thousands separators, e.g. `$1,250,000`
pub fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if price < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
