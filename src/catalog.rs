//! Product catalog client (read-only, remote).

use serde::{Deserialize, Serialize};

use crate::cart::ItemDraft;
use crate::endpoints::ApiConfig;
use crate::format;
use crate::http::{HttpError, HttpService, JsonRequest};

/// A catalog product as the API reports it. Deserialization is tolerant:
/// unknown fields are ignored and most fields are optional, since the API
/// has shipped both bare and enveloped shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub image: Option<ProductImage>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
}

/// The API has served images both as a bare URL string and as a
/// `{url, alt}` descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductImage {
    Url(String),
    Descriptor {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        alt: Option<String>,
    },
}

impl Product {
    /// The price to charge now: the discounted price when present, else the
    /// list price, else 0.
    pub fn current_price(&self) -> f64 {
        self.discounted_price.or(self.price).unwrap_or(0.0)
    }

    /// Whether the discounted price actually undercuts the list price.
    pub fn has_discount(&self) -> bool {
        matches!(
            (self.discounted_price, self.price),
            (Some(discounted), Some(list)) if discounted < list
        )
    }

    /// Cart draft for this product at its current price, the way the product
    /// page adds it.
    pub fn to_cart_draft(&self) -> ItemDraft {
        let mut draft = ItemDraft::new(self.id.clone())
            .title(self.title.clone())
            .price(self.current_price())
            .alt(format::image_alt(self));
        let url = format::image_url(self);
        if !url.is_empty() {
            draft = draft.image(url);
        }
        draft
    }
}

/// Remote catalog reader.
#[derive(Clone)]
pub struct CatalogClient {
    http: HttpService,
    api: ApiConfig,
}

impl CatalogClient {
    pub fn new(http: HttpService, api: ApiConfig) -> Self {
        Self { http, api }
    }

    /// Fetch the full product list. Accepts a bare array or an enveloped
    /// `{data: [...]}` response.
    pub fn products(&self) -> Result<Vec<Product>, HttpError> {
        let value = self
            .http
            .fetch_json(&JsonRequest::get(self.api.online_shop_url("")))?;
        serde_json::from_value(value).map_err(|_| HttpError::UnexpectedPayload {
            context: "product list",
        })
    }

    /// Fetch one product by id.
    pub fn product(&self, id: &str) -> Result<Product, HttpError> {
        let value = self
            .http
            .fetch_json(&JsonRequest::get(self.api.online_shop_url(id)))?;
        serde_json::from_value(value).map_err(|_| HttpError::UnexpectedPayload {
            context: "product",
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::http::testing::*;

    fn client(script: Vec<Scripted>) -> CatalogClient {
        let transport = Arc::new(StubTransport::new(script));
        CatalogClient::new(HttpService::new(transport), ApiConfig::default())
    }

    #[test]
    fn reads_a_bare_product_array() {
        let client = client(vec![json_response(
            200,
            r#"[{"id": "p1", "title": "Mug", "price": 12.5}]"#,
        )]);
        let products = client.products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Mug");
        assert_eq!(products[0].current_price(), 12.5);
    }

    #[test]
    fn reads_an_enveloped_product_array() {
        let client = client(vec![json_response(
            200,
            r#"{"data": [{"id": "p1", "title": "Mug"}], "meta": {}}"#,
        )]);
        let products = client.products().unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn non_array_listing_is_an_unexpected_payload() {
        let client = client(vec![json_response(200, r#"{"unexpected": true}"#)]);
        assert!(matches!(
            client.products(),
            Err(HttpError::UnexpectedPayload { .. })
        ));
    }

    #[test]
    fn image_shapes_both_parse() {
        let bare: Product =
            serde_json::from_value(json!({"id": "a", "image": "https://cdn.test/a.jpg"})).unwrap();
        assert!(matches!(bare.image, Some(ProductImage::Url(_))));

        let descriptor: Product = serde_json::from_value(
            json!({"id": "b", "image": {"url": "https://cdn.test/b.jpg", "alt": "A mug"}}),
        )
        .unwrap();
        assert!(matches!(
            descriptor.image,
            Some(ProductImage::Descriptor { .. })
        ));
    }

    #[test]
    fn current_price_prefers_the_discount() {
        let product = Product {
            price: Some(20.0),
            discounted_price: Some(15.0),
            ..Product::default()
        };
        assert_eq!(product.current_price(), 15.0);
        assert!(product.has_discount());

        let no_discount = Product {
            price: Some(20.0),
            discounted_price: Some(20.0),
            ..Product::default()
        };
        assert!(!no_discount.has_discount());
        assert_eq!(Product::default().current_price(), 0.0);
    }

    #[test]
    fn cart_draft_snapshots_the_current_price() {
        let product = Product {
            id: "p1".to_string(),
            title: "Mug".to_string(),
            price: Some(20.0),
            discounted_price: Some(15.0),
            image_url: Some("https://cdn.test/mug.jpg".to_string()),
            ..Product::default()
        };
        let draft = product.to_cart_draft();
        assert_eq!(draft.id, "p1");
        assert_eq!(draft.price, Some(15.0));
        assert_eq!(draft.image.as_deref(), Some("https://cdn.test/mug.jpg"));
        assert_eq!(draft.alt.as_deref(), Some("Mug"));
    }
}
