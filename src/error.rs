use thiserror::Error;

use crate::auth::AuthError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::http::HttpError;
use crate::orders::OrderError;
use crate::session::SessionError;
use crate::storage::StorageError;

/// Whether retrying this operation may succeed.
///
/// Write-path failures are surfaced to the caller, who is expected to show a
/// user-facing retry message; this tells them whether retrying is worth
/// offering at all.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transience {
    /// Retry will never help without changing inputs/state.
    Permanent,
    /// Retry may help (transient outage or contention).
    Retryable,
    /// Unknown if retry will help.
    Unknown,
}

impl Transience {
    pub fn is_retryable(self) -> bool {
        matches!(self, Transience::Retryable)
    }
}

/// Crate-level convenience error.
///
/// Not a "god error": it is a thin wrapper over the capability errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    pub fn transience(&self) -> Transience {
        match self {
            Error::Cart(e) => e.transience(),
            Error::Order(e) => e.transience(),
            Error::Session(e) => e.transience(),
            Error::Checkout(e) => e.transience(),
            Error::Auth(e) => e.transience(),
            Error::Http(e) => e.transience(),
            Error::Config(e) => e.transience(),
            Error::Storage(e) => e.transience(),
        }
    }
}
