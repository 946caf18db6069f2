//! The cart line item and its normalization pass.
//!
//! Stored carts come back as untrusted JSON; incoming items come from page
//! code. Both go through [`LineItem::sanitize`] before anything trusts them.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One product entry in the cart, keyed by product id, carrying a quantity
/// and a price snapshot.
///
/// Field names stay lowercase single words so blobs written by the browser
/// client parse unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub quantity: f64,
    pub image: Option<String>,
    pub alt: String,
}

impl LineItem {
    /// Normalize one raw stored element into a trusted line item.
    ///
    /// `id` and `quantity` are reject fields: a missing/empty id, or a
    /// quantity that does not coerce to a finite positive number, drops the
    /// element entirely. `title`, `price`, `image`, and `alt` are default
    /// fields: they coerce and never cause a drop. That asymmetry is a
    /// contract, not an accident — a line with a garbage price is kept at
    /// price 0, a line with a garbage quantity is gone.
    pub(crate) fn sanitize(raw: &Value) -> Option<LineItem> {
        let id = item_id(raw.get("id")?)?;

        let quantity = coerce_number(raw.get("quantity"))?;
        if quantity <= 0.0 {
            return None;
        }

        let raw_title = raw
            .get("title")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        let alt = match raw.get("alt").and_then(Value::as_str) {
            Some(alt) => alt.to_string(),
            None => raw_title.unwrap_or("Cart item").to_string(),
        };

        Some(LineItem {
            id,
            title: raw_title.unwrap_or("Product").to_string(),
            price: coerce_number(raw.get("price")).unwrap_or(0.0),
            quantity,
            image: raw.get("image").and_then(Value::as_str).map(str::to_string),
            alt,
        })
    }

    /// Whether this item may be persisted at all.
    pub(crate) fn is_persistable(&self) -> bool {
        !self.id.is_empty() && self.quantity.is_finite() && self.quantity > 0.0
    }

    /// Line total (price snapshot times quantity).
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Incoming item for [`CartStore::add_item`](super::CartStore::add_item) —
/// everything but the quantity, which the store controls.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub alt: Option<String>,
}

impl ItemDraft {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Render the draft as a raw element so it rides through the same
    /// normalization pass as stored data. A non-finite price serializes as
    /// null and coerces to 0 downstream.
    pub(crate) fn to_raw(&self, quantity: f64) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "price": self.price,
            "quantity": quantity,
            "image": self.image,
            "alt": self.alt,
        })
    }
}

fn item_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric coercion for stored fields: JSON numbers pass through, numeric
/// strings parse, everything else is non-numeric. Non-finite results are
/// treated as non-numeric.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_or_empty_id() {
        assert_eq!(LineItem::sanitize(&json!({"quantity": 1})), None);
        assert_eq!(LineItem::sanitize(&json!({"id": "", "quantity": 1})), None);
        assert_eq!(
            LineItem::sanitize(&json!({"id": null, "quantity": 1})),
            None
        );
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_quantity() {
        assert_eq!(
            LineItem::sanitize(&json!({"id": "p1", "quantity": 0})),
            None
        );
        assert_eq!(
            LineItem::sanitize(&json!({"id": "p1", "quantity": -1})),
            None
        );
        assert_eq!(
            LineItem::sanitize(&json!({"id": "p1", "quantity": "abc"})),
            None
        );
        assert_eq!(LineItem::sanitize(&json!({"id": "p1"})), None);
    }

    #[test]
    fn defaults_price_title_image_alt() {
        let item = LineItem::sanitize(&json!({"id": "p1", "quantity": 2, "price": "abc"}))
            .expect("kept despite garbage price");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.title, "Product");
        assert_eq!(item.image, None);
        assert_eq!(item.alt, "Cart item");
    }

    #[test]
    fn numeric_strings_parse() {
        let item =
            LineItem::sanitize(&json!({"id": "p1", "quantity": "2", "price": "9.50"})).unwrap();
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.price, 9.5);
    }

    #[test]
    fn numeric_ids_are_kept_as_strings() {
        let item = LineItem::sanitize(&json!({"id": 42, "quantity": 1})).unwrap();
        assert_eq!(item.id, "42");
    }

    #[test]
    fn alt_falls_back_to_raw_title_then_generic() {
        let with_title =
            LineItem::sanitize(&json!({"id": "p1", "quantity": 1, "title": "Mug"})).unwrap();
        assert_eq!(with_title.alt, "Mug");

        let empty_title =
            LineItem::sanitize(&json!({"id": "p1", "quantity": 1, "title": ""})).unwrap();
        assert_eq!(empty_title.title, "Product");
        assert_eq!(empty_title.alt, "Cart item");

        let explicit =
            LineItem::sanitize(&json!({"id": "p1", "quantity": 1, "alt": "A mug"})).unwrap();
        assert_eq!(explicit.alt, "A mug");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let first =
            LineItem::sanitize(&json!({"id": "p1", "quantity": "3", "price": null})).unwrap();
        let again = LineItem::sanitize(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn draft_with_non_finite_price_coerces_to_zero() {
        let draft = ItemDraft::new("p1").price(f64::NAN);
        let item = LineItem::sanitize(&draft.to_raw(1.0)).unwrap();
        assert_eq!(item.price, 0.0);
    }
}
