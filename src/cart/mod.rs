//! The cart store: sole authority over the persisted cart.
//!
//! Every mutation is one read-full-list → mutate → write-full-list cycle
//! against the injected backend; there is no in-memory cache to go stale.
//! Reads fail soft (log, empty list); writes raise. That asymmetry is policy,
//! not a general convention.

mod line_item;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::config::StorageKeys;
use crate::error::Transience;
use crate::storage::{StorageBackend, StorageError};

pub use line_item::{ItemDraft, LineItem};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CartError {
    #[error("cart items must include an id")]
    MissingId,
    #[error("quantity must be zero or a positive number")]
    InvalidQuantity,
    #[error("cart item could not be normalized")]
    Normalization,
    #[error("the cart could not be updated")]
    Persistence(#[source] StorageError),
}

impl CartError {
    pub fn transience(&self) -> Transience {
        match self {
            CartError::Persistence(_) => Transience::Retryable,
            _ => Transience::Permanent,
        }
    }
}

/// Result of [`CartStore::add_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    /// The full cart after the write.
    pub items: Vec<LineItem>,
    /// The line the add landed on.
    pub item: LineItem,
    /// Whether the line was newly created rather than merged.
    pub is_new: bool,
}

/// Result of [`CartStore::set_item_quantity`] / [`CartStore::remove_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// The full cart after the write (or the unchanged cart on a no-op).
    pub items: Vec<LineItem>,
    /// The updated line; `None` when the id was absent or the line was
    /// deleted.
    pub item: Option<LineItem>,
}

/// Persisted shopping cart.
///
/// Constructed once at startup with an injected backend; see
/// [`Storefront`](crate::Storefront).
pub struct CartStore {
    storage: Arc<dyn StorageBackend>,
    key: String,
}

impl CartStore {
    pub fn new(storage: Arc<dyn StorageBackend>, keys: &StorageKeys) -> Self {
        Self {
            storage,
            key: keys.cart.clone(),
        }
    }

    /// Current cart contents as independent copies; mutating the returned
    /// list does not touch the store.
    ///
    /// Fails soft: storage or parse errors are logged and read as an empty
    /// cart.
    pub fn items(&self) -> Vec<LineItem> {
        self.read()
    }

    /// Add `quantity` of the drafted item, merging onto an existing line with
    /// the same id.
    ///
    /// A non-finite or non-positive `quantity` falls back to 1. On a merge
    /// the existing line keeps its title/price snapshot; only the quantity
    /// grows. A persistence failure discards the mutation — the stored cart
    /// is unchanged.
    pub fn add_item(&self, draft: &ItemDraft, quantity: f64) -> Result<AddOutcome, CartError> {
        if draft.id.is_empty() {
            return Err(CartError::MissingId);
        }

        let increment = if quantity.is_finite() && quantity > 0.0 {
            quantity
        } else {
            1.0
        };
        let base = LineItem::sanitize(&draft.to_raw(increment)).ok_or(CartError::Normalization)?;

        let mut items = self.read();
        let existing = items.iter().position(|line| line.id == base.id);

        let item = match existing {
            Some(index) => {
                items[index].quantity += increment;
                items[index].clone()
            }
            None => {
                items.push(base.clone());
                base
            }
        };

        self.persist(&items)?;
        Ok(AddOutcome {
            items,
            item,
            is_new: existing.is_none(),
        })
    }

    /// Set the quantity of the line with `id`, deleting it at exactly 0.
    ///
    /// An absent id is an idempotent no-op, not an error. `quantity` must be
    /// finite and ≥ 0.
    pub fn set_item_quantity(&self, id: &str, quantity: f64) -> Result<UpdateOutcome, CartError> {
        if id.is_empty() {
            return Err(CartError::MissingId);
        }
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut items = self.read();
        let Some(index) = items.iter().position(|line| line.id == id) else {
            return Ok(UpdateOutcome { items, item: None });
        };

        let item = if quantity == 0.0 {
            items.remove(index);
            None
        } else {
            items[index].quantity = quantity;
            Some(items[index].clone())
        };

        self.persist(&items)?;
        Ok(UpdateOutcome { items, item })
    }

    /// Remove the line with `id`; exactly `set_item_quantity(id, 0)`.
    pub fn remove_item(&self, id: &str) -> Result<UpdateOutcome, CartError> {
        self.set_item_quantity(id, 0.0)
    }

    /// Delete the whole cart. Best-effort: failures are logged, never raised.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::error!("failed to clear the cart: {err}");
        }
    }

    /// Sum of quantities across the persisted cart.
    pub fn total_quantity(&self) -> f64 {
        self.read().iter().map(|item| item.quantity).sum()
    }

    /// Sum of `price * quantity` across the persisted cart.
    pub fn subtotal(&self) -> f64 {
        self.read().iter().map(LineItem::line_total).sum()
    }

    fn read(&self) -> Vec<LineItem> {
        let stored = match self.storage.get(&self.key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::error!("failed to read the cart from storage: {err}");
                return Vec::new();
            }
        };

        let parsed: Value = match serde_json::from_str(&stored) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::error!("failed to parse the stored cart: {err}");
                return Vec::new();
            }
        };

        // Anything that is not an array reads as an empty cart.
        let Value::Array(elements) = parsed else {
            return Vec::new();
        };
        elements.iter().filter_map(LineItem::sanitize).collect()
    }

    fn persist(&self, items: &[LineItem]) -> Result<(), CartError> {
        // Normalization applies on write as well as read.
        let normalized: Vec<&LineItem> = items
            .iter()
            .filter(|item| item.is_persistable())
            .collect();
        let payload = serde_json::to_string(&normalized).map_err(|e| {
            CartError::Persistence(StorageError::Write {
                key: self.key.clone(),
                reason: e.to_string(),
            })
        })?;
        self.storage
            .set(&self.key, &payload)
            .map_err(CartError::Persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, CartStore) {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage.clone(), &StorageKeys::default());
        (storage, cart)
    }

    /// Backend whose writes always fail; reads pass through.
    struct BrokenWrites(MemoryStorage);

    impl StorageBackend for BrokenWrites {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn add_to_empty_cart() {
        let (_, cart) = store();
        let outcome = cart
            .add_item(&ItemDraft::new("p1").title("Mug").price(10.0), 2.0)
            .unwrap();

        assert!(outcome.is_new);
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.item.quantity, 2.0);
        assert_eq!(cart.subtotal(), 20.0);
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let (_, cart) = store();
        cart.add_item(&ItemDraft::new("p1").price(10.0), 2.0).unwrap();
        let outcome = cart.add_item(&ItemDraft::new("p1").price(10.0), 3.0).unwrap();

        assert!(!outcome.is_new);
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.item.quantity, 5.0);
        assert_eq!(cart.total_quantity(), 5.0);
    }

    #[test]
    fn merge_keeps_the_existing_snapshot() {
        let (_, cart) = store();
        cart.add_item(&ItemDraft::new("p1").title("Mug").price(10.0), 1.0)
            .unwrap();
        let outcome = cart
            .add_item(&ItemDraft::new("p1").title("Renamed").price(99.0), 1.0)
            .unwrap();

        assert_eq!(outcome.item.title, "Mug");
        assert_eq!(outcome.item.price, 10.0);
        assert_eq!(outcome.item.quantity, 2.0);
    }

    #[test]
    fn add_quantity_defaults_to_one() {
        let (_, cart) = store();
        let outcome = cart.add_item(&ItemDraft::new("p1"), f64::NAN).unwrap();
        assert_eq!(outcome.item.quantity, 1.0);

        let outcome = cart.add_item(&ItemDraft::new("p1"), -3.0).unwrap();
        assert_eq!(outcome.item.quantity, 2.0);
    }

    #[test]
    fn add_requires_an_id() {
        let (_, cart) = store();
        assert!(matches!(
            cart.add_item(&ItemDraft::default(), 1.0),
            Err(CartError::MissingId)
        ));
    }

    #[test]
    fn set_quantity_zero_removes_the_line() {
        let (_, cart) = store();
        cart.add_item(&ItemDraft::new("p1"), 2.0).unwrap();

        let outcome = cart.set_item_quantity("p1", 0.0).unwrap();
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.item, None);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn remove_matches_set_quantity_zero() {
        let (_, cart) = store();
        cart.add_item(&ItemDraft::new("p1"), 2.0).unwrap();
        cart.add_item(&ItemDraft::new("p2"), 1.0).unwrap();

        cart.remove_item("p1").unwrap();
        let ids: Vec<_> = cart.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["p2".to_string()]);
    }

    #[test]
    fn updating_an_absent_id_is_a_no_op() {
        let (_, cart) = store();
        cart.add_item(&ItemDraft::new("p1"), 1.0).unwrap();

        let outcome = cart.set_item_quantity("ghost", 0.0).unwrap();
        assert_eq!(outcome.item, None);
        assert_eq!(outcome.items.len(), 1);

        let outcome = cart.set_item_quantity("ghost", 5.0).unwrap();
        assert_eq!(outcome.item, None);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn set_quantity_validates_input() {
        let (_, cart) = store();
        assert!(matches!(
            cart.set_item_quantity("", 1.0),
            Err(CartError::MissingId)
        ));
        assert!(matches!(
            cart.set_item_quantity("p1", -1.0),
            Err(CartError::InvalidQuantity)
        ));
        assert!(matches!(
            cart.set_item_quantity("p1", f64::NAN),
            Err(CartError::InvalidQuantity)
        ));
    }

    #[test]
    fn corrupted_storage_reads_as_empty() {
        let (storage, cart) = store();
        storage.set(&StorageKeys::default().cart, "{not json").unwrap();
        assert!(cart.items().is_empty());

        storage
            .set(&StorageKeys::default().cart, "{\"not\": \"an array\"}")
            .unwrap();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_quantity(), 0.0);
    }

    #[test]
    fn invalid_stored_lines_are_dropped_on_read() {
        let (storage, cart) = store();
        storage
            .set(
                &StorageKeys::default().cart,
                r#"[
                    {"id": "p1", "quantity": 2, "price": 10},
                    {"id": "", "quantity": 2},
                    {"id": "p2", "quantity": "abc"},
                    {"id": "p3", "quantity": 1, "price": "abc"}
                ]"#,
            )
            .unwrap();

        let items = cart.items();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(items[1].price, 0.0);
        assert_eq!(cart.subtotal(), 20.0);
    }

    #[test]
    fn persistence_failure_discards_the_mutation() {
        let inner = MemoryStorage::new();
        inner
            .set(
                &StorageKeys::default().cart,
                r#"[{"id": "p1", "quantity": 2}]"#,
            )
            .unwrap();
        let cart = CartStore::new(Arc::new(BrokenWrites(inner)), &StorageKeys::default());

        let err = cart.add_item(&ItemDraft::new("p1"), 3.0).unwrap_err();
        assert!(matches!(err, CartError::Persistence(_)));
        assert!(err.transience().is_retryable());
        // The stored cart is untouched.
        assert_eq!(cart.items()[0].quantity, 2.0);

        assert!(matches!(
            cart.set_item_quantity("p1", 0.0),
            Err(CartError::Persistence(_))
        ));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn returned_lists_are_independent_copies() {
        let (_, cart) = store();
        cart.add_item(&ItemDraft::new("p1"), 1.0).unwrap();

        let mut items = cart.items();
        items[0].quantity = 99.0;
        items.clear();
        assert_eq!(cart.items()[0].quantity, 1.0);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let (_, cart) = store();
        for id in ["b", "a", "c"] {
            cart.add_item(&ItemDraft::new(id), 1.0).unwrap();
        }
        cart.add_item(&ItemDraft::new("a"), 1.0).unwrap();

        let ids: Vec<_> = cart.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["b".to_string(), "a".to_string(), "c".to_string()]);
    }

    #[test]
    fn clear_removes_the_storage_key() {
        let (storage, cart) = store();
        cart.add_item(&ItemDraft::new("p1"), 1.0).unwrap();
        cart.clear();
        assert_eq!(storage.get(&StorageKeys::default().cart).unwrap(), None);
        assert!(cart.items().is_empty());
    }
}
