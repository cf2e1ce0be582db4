use crate::browse::PageView;
use crate::catalog::validation::ValidationErrors;
use crate::models::{format_price, Property};
use std::fmt::Write;

/// Catalog region: spinner, error, empty notice, or the page of cards
pub fn page_view(view: &PageView) -> String {
    let mut out = String::new();

    if view.loading {
        out.push_str("⏳ Loading properties...\n");
        return out;
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "❌ Error: {}", error);
        return out;
    }
    if view.show_no_results {
        out.push_str("No properties match the selected filters.\n");
        return out;
    }

    let _ = writeln!(out, "{}\n", view.summary());
    let offset = view.page.offset();
    for (i, property) in view.page.items.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", offset + i + 1, property.name, format_price(property.price));
        let _ = writeln!(out, "   {}", property.address);
        let _ = writeln!(out, "   ID: {}", property.id);
        out.push('\n');
    }
    if view.has_pagination() {
        let pages: Vec<String> = (1..=view.page.total_pages)
            .map(|p| {
                if p == view.page.page_number {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "Pages: {}", pages.join(" "));
    }
    out
}

/// Detail view of one property
pub fn property_detail(property: &Property) -> String {
    format!(
        "{}\n   Address: {}\n   Price: {}\n   Image: {}\n   Owner: {}\n   ID: {}\n",
        property.name,
        property.address,
        format_price(property.price),
        property.image_url,
        property.owner_id,
        property.id
    )
}

/// One line per rejected creation field
pub fn validation_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}: {}\n", e.field, e.message))
        .collect()
}
