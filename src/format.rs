//! Display formatting helpers shared by the pages.

use crate::catalog::{Product, ProductImage};

/// Format a price for display. Non-finite values render as zero.
pub fn format_price(value: f64, currency: &str) -> String {
    let amount = if value.is_finite() { value } else { 0.0 };
    let (sign, magnitude) = if amount < 0.0 {
        ("-", -amount)
    } else {
        ("", amount)
    };

    match currency {
        "USD" => format!("{sign}${magnitude:.2}"),
        "EUR" => format!("{sign}€{magnitude:.2}"),
        "GBP" => format!("{sign}£{magnitude:.2}"),
        _ => format!("{sign}{magnitude:.2} {currency}"),
    }
}

/// Resolve a product's display image URL: explicit `imageUrl` first, then a
/// bare-string `image`, then a descriptor's `url`. Empty when nothing usable
/// is present (callers substitute their own placeholder).
pub fn image_url(product: &Product) -> String {
    if let Some(url) = product.image_url.as_deref()
        && !url.trim().is_empty()
    {
        return url.to_string();
    }
    match &product.image {
        Some(ProductImage::Url(url)) if !url.trim().is_empty() => url.clone(),
        Some(ProductImage::Descriptor { url: Some(url), .. }) => url.clone(),
        _ => String::new(),
    }
}

/// Alt text for a product image: the descriptor's own alt, else the title,
/// else a generic fallback.
pub fn image_alt(product: &Product) -> String {
    if let Some(ProductImage::Descriptor { alt: Some(alt), .. }) = &product.image
        && !alt.trim().is_empty()
    {
        return alt.clone();
    }
    if !product.title.is_empty() {
        return product.title.clone();
    }
    "Product image".to_string()
}

/// Up to three tags as `#a · #b · #c`; a stock label when there are none.
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "New arrival".to_string();
    }
    tags.iter()
        .take(3)
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" · ")
}
