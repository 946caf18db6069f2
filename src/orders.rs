//! The order store: a single snapshot of the last completed order.
//!
//! Written once at checkout completion, read by the confirmation page, and
//! only ever replaced wholesale or cleared.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cart::LineItem;
use crate::config::StorageKeys;
use crate::error::Transience;
use crate::storage::{StorageBackend, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OrderError {
    #[error("the order confirmation could not be stored")]
    Persistence(#[source] StorageError),
}

impl OrderError {
    pub fn transience(&self) -> Transience {
        Transience::Retryable
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub address: String,
    pub city: String,
    pub postal: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

/// Snapshot of a completed order.
///
/// An empty `order_number` means "not assigned yet"; [`OrderStore::save`]
/// generates one. `saved_at` is always stamped at save time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSnapshot {
    pub order_number: String,
    pub created_at: String,
    pub payment_method: String,
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub customer: Customer,
    pub delivery: Delivery,
    pub notes: Option<String>,
    pub saved_at: String,
}

/// Persisted last-order snapshot store.
pub struct OrderStore {
    storage: Arc<dyn StorageBackend>,
    key: String,
}

impl OrderStore {
    pub fn new(storage: Arc<dyn StorageBackend>, keys: &StorageKeys) -> Self {
        Self {
            storage,
            key: keys.order.clone(),
        }
    }

    /// Persist `order`, assigning an order number if it has none and
    /// stamping `saved_at`. Overwrites any previous snapshot.
    pub fn save(&self, mut order: OrderSnapshot) -> Result<OrderSnapshot, OrderError> {
        if order.order_number.is_empty() {
            order.order_number = generate_order_number();
        }
        order.saved_at = now_rfc3339();

        let payload = serde_json::to_string(&order).map_err(|e| {
            OrderError::Persistence(StorageError::Write {
                key: self.key.clone(),
                reason: e.to_string(),
            })
        })?;
        self.storage
            .set(&self.key, &payload)
            .map_err(OrderError::Persistence)?;
        Ok(order)
    }

    /// The last saved snapshot, or `None` on absence or any parse failure.
    pub fn last(&self) -> Option<OrderSnapshot> {
        let stored = match self.storage.get(&self.key) {
            Ok(stored) => stored?,
            Err(err) => {
                tracing::error!("failed to read the last order from storage: {err}");
                return None;
            }
        };
        serde_json::from_str(&stored).ok()
    }

    /// Delete the snapshot. Best-effort: failures are logged, never raised.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::error!("failed to clear the last order: {err}");
        }
    }
}

const ORDER_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a confirmation number: `TS-` + the last 4 base-36 digits of the
/// current epoch millis + 4 random base-36 characters, all uppercase.
///
/// A confirmation number, not a ledger key: the 4-character random suffix
/// collides roughly once per 1.6M draws.
pub fn generate_order_number() -> String {
    let timestamp = base36_upper(epoch_millis());
    let tail = &timestamp[timestamp.len().saturating_sub(4)..];

    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| ORDER_ALPHABET[rng.random_range(0..ORDER_ALPHABET.len())] as char)
        .collect();

    format!("TS-{tail}{suffix}")
}

pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn base36_upper(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ORDER_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|b| *b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, OrderStore) {
        let storage = Arc::new(MemoryStorage::new());
        let orders = OrderStore::new(storage.clone(), &StorageKeys::default());
        (storage, orders)
    }

    #[test]
    fn order_numbers_have_the_confirmation_shape() {
        for _ in 0..32 {
            let number = generate_order_number();
            assert_eq!(number.len(), 11, "unexpected shape: {number}");
            assert!(number.starts_with("TS-"));
            assert!(
                number[3..]
                    .bytes()
                    .all(|b| ORDER_ALPHABET.contains(&b)),
                "unexpected character in {number}"
            );
        }
    }

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(base36_upper(0), "0");
        assert_eq!(base36_upper(35), "Z");
        assert_eq!(base36_upper(36), "10");
        assert_eq!(base36_upper(46655), "ZZZ");
    }

    #[test]
    fn save_assigns_number_and_stamp() {
        let (_, orders) = store();
        let saved = orders.save(OrderSnapshot::default()).unwrap();

        assert!(saved.order_number.starts_with("TS-"));
        assert!(!saved.saved_at.is_empty());
        assert_eq!(orders.last().unwrap(), saved);
    }

    #[test]
    fn save_keeps_an_existing_number() {
        let (_, orders) = store();
        let saved = orders
            .save(OrderSnapshot {
                order_number: "TS-TEST0001".to_string(),
                ..OrderSnapshot::default()
            })
            .unwrap();
        assert_eq!(saved.order_number, "TS-TEST0001");
    }

    #[test]
    fn save_overwrites_the_previous_snapshot() {
        let (_, orders) = store();
        orders
            .save(OrderSnapshot {
                payment_method: "card".to_string(),
                ..OrderSnapshot::default()
            })
            .unwrap();
        orders
            .save(OrderSnapshot {
                payment_method: "invoice".to_string(),
                ..OrderSnapshot::default()
            })
            .unwrap();

        assert_eq!(orders.last().unwrap().payment_method, "invoice");
    }

    #[test]
    fn last_reads_soft() {
        let (storage, orders) = store();
        assert_eq!(orders.last(), None);

        storage
            .set(&StorageKeys::default().order, "definitely not json")
            .unwrap();
        assert_eq!(orders.last(), None);
    }

    #[test]
    fn clear_removes_the_snapshot() {
        let (_, orders) = store();
        orders.save(OrderSnapshot::default()).unwrap();
        orders.clear();
        assert_eq!(orders.last(), None);
    }
}
