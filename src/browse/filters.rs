use crate::catalog::types::{FilterQuery, PRICE_CEILING, PRICE_FLOOR};

/// A single raw edit coming from the filter inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Name(String),
    Address(String),
    /// Both ends of the price range, as dragged
    PriceRange(i64, i64),
}

/// What the user is currently typing, before any debounce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub name: String,
    pub address: String,
    pub min_price: i64,
    pub max_price: i64,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            min_price: PRICE_FLOOR,
            max_price: PRICE_CEILING,
        }
    }
}

impl FilterForm {
    /// Merge one edit into the form state
    pub fn apply(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::Name(name) => self.name = name,
            FilterEdit::Address(address) => self.address = address,
            FilterEdit::PriceRange(min, max) => {
                let (min, max) = clamp_range(min, max);
                self.min_price = min;
                self.max_price = max;
            }
        }
    }

    /// Merge an edit and return the resulting state
    pub fn with(mut self, edit: FilterEdit) -> Self {
        self.apply(edit);
        self
    }

    pub fn to_query(&self) -> FilterQuery {
        FilterQuery::new(&self.name, &self.address, self.min_price, self.max_price)
    }
}

/// Slider resolution
pub const PRICE_STEP: i64 = 10_000_000;
/// Smallest span the two ends may enclose
pub const MIN_PRICE_SPAN: i64 = 10_000_000;

/// Apply the slider's bounds policy to a dragged range
///
/// Both ends are snapped to the nearest step inside the bounds, ordered so
/// `min <= max`, then pushed apart to at least [`MIN_PRICE_SPAN`].
pub fn clamp_range(min: i64, max: i64) -> (i64, i64) {
    let (min, max) = (snap(min), snap(max));
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if max - min >= MIN_PRICE_SPAN {
        (min, max)
    } else if min + MIN_PRICE_SPAN <= PRICE_CEILING {
        (min, min + MIN_PRICE_SPAN)
    } else {
        (max - MIN_PRICE_SPAN, max)
    }
}

fn snap(value: i64) -> i64 {
    let value = value.clamp(PRICE_FLOOR, PRICE_CEILING);
    let steps = (value - PRICE_FLOOR + PRICE_STEP / 2) / PRICE_STEP;
    (PRICE_FLOOR + steps * PRICE_STEP).min(PRICE_CEILING)
}
