use serde::{Deserialize, Serialize};

use crate::endpoints::ApiConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage_keys: StorageKeys,
    pub currency: String,
    pub shipping: ShippingConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage_keys: StorageKeys::default(),
            currency: "USD".to_string(),
            shipping: ShippingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Storage key names. Defaults are the ones the browser client wrote, so a
/// migrated profile keeps its cart and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub cart: String,
    pub token: String,
    pub profile: String,
    pub order: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: "the-shop-cart".to_string(),
            token: "theShopToken".to_string(),
            profile: "theShopUser".to_string(),
            order: "the-shop-last-order".to_string(),
        }
    }
}

/// Flat shipping rate added at checkout. The default of 0 matches the
/// browser storefront, where the order total always equalled the subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShippingConfig {
    pub flat_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub stdout: bool,
    pub stdout_format: LogFormat,
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            stdout_format: LogFormat::Compact,
            filter: None,
        }
    }
}

// =============================================================================
// Override layer
// =============================================================================

/// Partial config as read from `config.toml`: every field optional, applied
/// over the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub api: ApiConfigOverride,
    pub storage_keys: StorageKeysOverride,
    pub currency: Option<String>,
    pub shipping: ShippingConfigOverride,
    pub logging: LoggingConfigOverride,
}

impl ConfigLayer {
    pub fn apply_to(&self, target: &mut Config) {
        self.api.apply_to(&mut target.api);
        self.storage_keys.apply_to(&mut target.storage_keys);
        if let Some(currency) = self.currency.as_ref() {
            target.currency = currency.clone();
        }
        self.shipping.apply_to(&mut target.shipping);
        self.logging.apply_to(&mut target.logging);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfigOverride {
    pub api_base: Option<String>,
    pub online_shop_base: Option<String>,
    pub auth_base: Option<String>,
    pub auth_legacy_base: Option<String>,
}

impl ApiConfigOverride {
    pub fn apply_to(&self, target: &mut ApiConfig) {
        if let Some(base) = self.api_base.as_ref() {
            target.api_base = base.clone();
        }
        if let Some(base) = self.online_shop_base.as_ref() {
            target.online_shop_base = base.clone();
        }
        if let Some(base) = self.auth_base.as_ref() {
            target.auth_base = base.clone();
        }
        if let Some(base) = self.auth_legacy_base.as_ref() {
            target.auth_legacy_base = base.clone();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeysOverride {
    pub cart: Option<String>,
    pub token: Option<String>,
    pub profile: Option<String>,
    pub order: Option<String>,
}

impl StorageKeysOverride {
    pub fn apply_to(&self, target: &mut StorageKeys) {
        if let Some(key) = self.cart.as_ref() {
            target.cart = key.clone();
        }
        if let Some(key) = self.token.as_ref() {
            target.token = key.clone();
        }
        if let Some(key) = self.profile.as_ref() {
            target.profile = key.clone();
        }
        if let Some(key) = self.order.as_ref() {
            target.order = key.clone();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingConfigOverride {
    pub flat_rate: Option<f64>,
}

impl ShippingConfigOverride {
    pub fn apply_to(&self, target: &mut ShippingConfig) {
        if let Some(rate) = self.flat_rate {
            target.flat_rate = rate;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfigOverride {
    pub stdout: Option<bool>,
    pub stdout_format: Option<LogFormat>,
    pub filter: Option<String>,
}

impl LoggingConfigOverride {
    pub fn apply_to(&self, target: &mut LoggingConfig) {
        if let Some(stdout) = self.stdout {
            target.stdout = stdout;
        }
        if let Some(format) = self.stdout_format {
            target.stdout_format = format;
        }
        if let Some(filter) = self.filter.as_ref() {
            target.filter = Some(filter.clone());
        }
    }
}
