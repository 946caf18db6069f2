use super::{Config, ConfigLayer};

pub fn merge_layers(user: Option<ConfigLayer>) -> Config {
    let mut config = Config::default();
    if let Some(layer) = user {
        layer.apply_to(&mut config);
    }
    config
}

pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Override application with an injected lookup so it can be exercised
/// without mutating the process environment.
fn apply_overrides_from(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| -> Option<String> {
        var(key)
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty())
    };

    if let Some(base) = non_empty("SF_API_BASE") {
        config.api.api_base = base;
    }
    if let Some(base) = non_empty("SF_ONLINE_SHOP_BASE") {
        config.api.online_shop_base = base;
    }
    if let Some(base) = non_empty("SF_AUTH_BASE") {
        config.api.auth_base = base;
    }
    if let Some(base) = non_empty("SF_AUTH_LEGACY_BASE") {
        config.api.auth_legacy_base = base;
    }
    if let Some(currency) = non_empty("SF_CURRENCY") {
        config.currency = currency;
    }

    if let Some(raw) = non_empty("SF_SHIPPING_FLAT_RATE") {
        match raw.parse::<f64>() {
            Ok(rate) if rate.is_finite() && rate >= 0.0 => {
                config.shipping.flat_rate = rate;
            }
            Ok(rate) => {
                tracing::warn!("SF_SHIPPING_FLAT_RATE {rate} out of range, ignoring");
            }
            Err(err) => {
                tracing::warn!("invalid SF_SHIPPING_FLAT_RATE, ignoring: {err}");
            }
        }
    }
}
