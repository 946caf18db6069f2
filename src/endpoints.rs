//! API base URLs and the auth candidate list.

use serde::{Deserialize, Serialize};

/// Remote API bases. Defaults point at the public catalog/auth service the
/// shop was built against; the v2 auth base is preferred and the legacy base
/// kept as a fallback candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_base: String,
    pub online_shop_base: String,
    pub auth_base: String,
    pub auth_legacy_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let api_base = "https://api.noroff.dev/api/v1".to_string();
        Self {
            online_shop_base: format!("{api_base}/online-shop"),
            auth_legacy_base: format!("{api_base}/auth"),
            auth_base: "https://v2.api.noroff.dev/auth".to_string(),
            api_base,
        }
    }
}

impl ApiConfig {
    /// Catalog URL for `path` (empty path = the listing endpoint).
    pub fn online_shop_url(&self, path: &str) -> String {
        append_path(&self.online_shop_base, path)
    }

    /// Auth URL for `path`, preferring the requested base but falling back
    /// to whichever one is configured.
    pub fn auth_url(&self, path: &str, legacy: bool) -> String {
        let (wanted, other) = if legacy {
            (&self.auth_legacy_base, &self.auth_base)
        } else {
            (&self.auth_base, &self.auth_legacy_base)
        };
        let base = if !wanted.is_empty() { wanted } else { other };
        append_path(base, path)
    }

    /// Ordered, deduplicated candidate list for the fallback poster:
    /// current base first, then legacy.
    pub fn auth_url_list(&self, path: &str) -> Vec<String> {
        let mut urls = Vec::new();

        if !self.auth_base.is_empty() {
            let primary = self.auth_url(path, false);
            if !primary.is_empty() {
                urls.push(primary);
            }
        }
        if !self.auth_legacy_base.is_empty() {
            let legacy = self.auth_url(path, true);
            if !legacy.is_empty() && !urls.contains(&legacy) {
                urls.push(legacy);
            }
        }

        if urls.is_empty() {
            vec![self.auth_url(path, false)]
        } else {
            urls
        }
    }
}

/// Join `path` onto `base`; absolute `http…` paths pass through unchanged.
fn append_path(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with("http") {
        return path.to_string();
    }
    let separator = if path.starts_with('/') { "" } else { "/" };
    format!("{base}{separator}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_with_and_without_slashes() {
        let api = ApiConfig::default();
        assert_eq!(
            api.online_shop_url("abc"),
            "https://api.noroff.dev/api/v1/online-shop/abc"
        );
        assert_eq!(
            api.online_shop_url("/abc"),
            "https://api.noroff.dev/api/v1/online-shop/abc"
        );
        assert_eq!(
            api.online_shop_url(""),
            "https://api.noroff.dev/api/v1/online-shop"
        );
    }

    #[test]
    fn absolute_paths_pass_through() {
        let api = ApiConfig::default();
        assert_eq!(
            api.online_shop_url("https://elsewhere.test/x"),
            "https://elsewhere.test/x"
        );
    }

    #[test]
    fn auth_list_orders_current_before_legacy() {
        let api = ApiConfig::default();
        assert_eq!(
            api.auth_url_list("login"),
            vec![
                "https://v2.api.noroff.dev/auth/login".to_string(),
                "https://api.noroff.dev/api/v1/auth/login".to_string(),
            ]
        );
    }

    #[test]
    fn auth_list_deduplicates_identical_bases() {
        let api = ApiConfig {
            auth_base: "https://one.test/auth".to_string(),
            auth_legacy_base: "https://one.test/auth".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            api.auth_url_list("login"),
            vec!["https://one.test/auth/login".to_string()]
        );
    }

    #[test]
    fn missing_bases_fall_back_to_the_other() {
        let api = ApiConfig {
            auth_base: String::new(),
            ..ApiConfig::default()
        };
        assert_eq!(
            api.auth_url("login", false),
            "https://api.noroff.dev/api/v1/auth/login"
        );
        assert_eq!(
            api.auth_url_list("login"),
            vec!["https://api.noroff.dev/api/v1/auth/login".to_string()]
        );
    }
}
