#![forbid(unsafe_code)]

//! Client-side core for the shop demo.
//!
//! Persisted cart/order/session stores over an injected storage backend,
//! plus the catalog and auth clients for the remote API. Stores follow one
//! policy throughout: reads degrade to empty results, writes raise.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod http;
pub mod orders;
mod paths;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use error::{Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the working set at the crate root for convenience.
pub use crate::auth::{AuthClient, AuthSuccess, Credentials, Registration};
pub use crate::cart::{AddOutcome, CartStore, ItemDraft, LineItem, UpdateOutcome};
pub use crate::catalog::{CatalogClient, Product};
pub use crate::checkout::CheckoutDraft;
pub use crate::config::{Config, StorageKeys};
pub use crate::endpoints::ApiConfig;
pub use crate::http::{HttpService, UreqTransport};
pub use crate::orders::{
    Customer, Delivery, OrderSnapshot, OrderStore, Totals, generate_order_number,
};
pub use crate::paths::storage_dir;
pub use crate::session::{Profile, SessionStore};
pub use crate::storage::{FileStorage, MemoryStorage, StorageBackend};

use std::sync::Arc;

use crate::http::HttpTransport;

/// The assembled storefront: every store and client, built once at process
/// start from one config.
///
/// This replaces the browser client's frozen module globals with an explicit
/// object carrying injected storage and transport, so everything here is
/// testable without real storage or a network.
pub struct Storefront {
    config: Config,
    pub cart: CartStore,
    pub orders: OrderStore,
    pub session: SessionStore,
    pub catalog: CatalogClient,
    pub auth: AuthClient,
}

impl Storefront {
    /// Open the storefront against on-disk storage and the real network.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Arc::new(FileStorage::open(paths::storage_dir())?);
        Ok(Self::with_parts(
            config,
            storage,
            Arc::new(UreqTransport::default()),
        ))
    }

    /// Assemble from explicit parts; the seam tests and embedders use.
    pub fn with_parts(
        config: Config,
        storage: Arc<dyn StorageBackend>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let http = HttpService::new(transport);
        Self {
            cart: CartStore::new(storage.clone(), &config.storage_keys),
            orders: OrderStore::new(storage.clone(), &config.storage_keys),
            session: SessionStore::new(storage, &config.storage_keys),
            catalog: CatalogClient::new(http.clone(), config.api.clone()),
            auth: AuthClient::new(http, config.api.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Complete checkout with the configured shipping rate; see
    /// [`checkout::complete`].
    pub fn checkout(&self, draft: CheckoutDraft) -> Result<OrderSnapshot> {
        checkout::complete(
            draft,
            &self.cart,
            &self.orders,
            self.config.shipping.flat_rate,
        )
        .map_err(Into::into)
    }

    /// Sign in and remember the session; see
    /// [`AuthClient::login_and_remember`].
    pub fn sign_in(&self, credentials: &Credentials) -> Result<AuthSuccess> {
        self.auth
            .login_and_remember(&self.session, credentials)
            .map_err(Into::into)
    }

    /// Sign out (best-effort).
    pub fn sign_out(&self) {
        self.session.clear();
    }
}
