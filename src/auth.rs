//! Auth client: login and registration through the endpoint fallback poster.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::endpoints::ApiConfig;
use crate::error::Transience;
use crate::http::{HttpError, HttpService};
use crate::session::{Profile, SessionError, SessionStore};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("the server did not return a valid access token")]
    MissingAccessToken,

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn transience(&self) -> Transience {
        match self {
            AuthError::MissingAccessToken => Transience::Permanent,
            AuthError::Http(e) => e.transience(),
            AuthError::Session(e) => e.transience(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A successful sign-in: the bearer token plus the profile to remember.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSuccess {
    pub access_token: String,
    pub profile: Profile,
}

#[derive(Clone)]
pub struct AuthClient {
    http: HttpService,
    api: ApiConfig,
}

impl AuthClient {
    pub fn new(http: HttpService, api: ApiConfig) -> Self {
        Self { http, api }
    }

    /// Sign in. Tries the configured auth bases in order (see the fallback
    /// poster); the response must carry a string `accessToken`. Profile
    /// fields missing from the response fall back to the submitted email.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthSuccess, AuthError> {
        let payload = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let endpoints = self.api.auth_url_list("login");
        let result = self
            .http
            .post_json_with_fallback(&endpoints, &payload, "login")?;

        let access_token = result
            .get("accessToken")
            .and_then(Value::as_str)
            .ok_or(AuthError::MissingAccessToken)?
            .to_string();
        let profile = Profile {
            name: result
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            email: result
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or(&credentials.email)
                .to_string(),
            avatar: result
                .get("avatar")
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        Ok(AuthSuccess {
            access_token,
            profile,
        })
    }

    /// Create an account. Returns whatever the API reports about the new
    /// account; callers usually follow up with [`AuthClient::login`].
    pub fn register(&self, registration: &Registration) -> Result<Value, AuthError> {
        let payload = serde_json::json!({
            "name": registration.name,
            "email": registration.email,
            "password": registration.password,
        });
        let endpoints = self.api.auth_url_list("register");
        Ok(self
            .http
            .post_json_with_fallback(&endpoints, &payload, "registration")?)
    }

    /// Sign in and persist the token and profile through `session`.
    pub fn login_and_remember(
        &self,
        session: &SessionStore,
        credentials: &Credentials,
    ) -> Result<AuthSuccess, AuthError> {
        let success = self.login(credentials)?;
        session.set_token(&success.access_token)?;
        session.set_profile(&success.profile)?;
        Ok(success)
    }
}
