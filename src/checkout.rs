//! Checkout completion: turn the live cart into an order snapshot.

use thiserror::Error;

use crate::cart::{CartStore, LineItem};
use crate::error::Transience;
use crate::orders::{Customer, Delivery, OrderError, OrderSnapshot, OrderStore, Totals, now_rfc3339};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl CheckoutError {
    pub fn transience(&self) -> Transience {
        match self {
            CheckoutError::EmptyCart => Transience::Permanent,
            CheckoutError::Order(e) => e.transience(),
        }
    }
}

/// What the checkout form collected.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDraft {
    pub customer: Customer,
    pub delivery: Delivery,
    pub payment_method: String,
    pub notes: Option<String>,
}

/// Totals for a set of line items under a flat shipping rate.
pub fn totals_for(items: &[LineItem], shipping: f64) -> Totals {
    let subtotal: f64 = items.iter().map(LineItem::line_total).sum();
    Totals {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}

/// Complete checkout: snapshot the cart into an order, persist it, and clear
/// the cart.
///
/// The cart is cleared only after the order persisted; a persistence failure
/// leaves the cart intact so the shopper can retry.
pub fn complete(
    draft: CheckoutDraft,
    cart: &CartStore,
    orders: &OrderStore,
    shipping: f64,
) -> Result<OrderSnapshot, CheckoutError> {
    let items = cart.items();
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let totals = totals_for(&items, shipping);
    let order = OrderSnapshot {
        order_number: String::new(),
        created_at: now_rfc3339(),
        payment_method: draft.payment_method,
        items,
        totals,
        customer: draft.customer,
        delivery: draft.delivery,
        notes: draft.notes,
        saved_at: String::new(),
    };

    let saved = orders.save(order)?;
    cart.clear();
    Ok(saved)
}
