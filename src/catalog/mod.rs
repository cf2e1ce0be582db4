pub mod client;
pub mod memory;
pub mod traits;
pub mod types;
pub mod validation;

pub use client::HttpPropertyService;
pub use memory::InMemoryPropertyService;
pub use traits::PropertyService;
pub use types::FilterQuery;
pub use validation::{create_property, CreatePropertyForm, FieldError, ValidationErrors};
