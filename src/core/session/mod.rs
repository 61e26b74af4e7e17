//! Session state shared by every endpoint wrapper
//!
//! A [`SessionContext`] is created once per logged-in client and handed to the
//! pipeline behind an `Arc`. Requests only read it. Credential refreshes coming
//! back from the backend (new cookies, a rotated `fb_dtsg` token) go through the
//! session's own locks, so concurrent requests never need to coordinate.

pub mod app_state;

pub use app_state::{AppState, AppStateCookie, USER_ID_COOKIE};

use crate::core::form::FormPayload;
use crate::utils::error::{ApiError, Result};
use parking_lot::RwLock;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Default backend origin
pub const DEFAULT_BASE_URL: &str = "https://www.facebook.com";

/// Request-signing material attached to every POST
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningState {
    pub fb_dtsg: Option<String>,
    pub jazoest: Option<String>,
}

impl SigningState {
    pub fn with_token(fb_dtsg: impl Into<String>) -> Self {
        let fb_dtsg = fb_dtsg.into();
        let jazoest = jazoest(&fb_dtsg);
        Self {
            fb_dtsg: Some(fb_dtsg),
            jazoest: Some(jazoest),
        }
    }
}

/// Checksum sent next to the token: `"2"` followed by the sum of its char codes
pub fn jazoest(fb_dtsg: &str) -> String {
    let sum: u64 = fb_dtsg.chars().map(|c| u64::from(u32::from(c))).sum();
    format!("2{}", sum)
}

/// A cookie handed back by the backend inside a response envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedCookie {
    pub name: String,
    pub value: String,
}

/// Credentials found in a response that should replace the current ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRefresh {
    pub fb_dtsg: Option<String>,
    pub cookies: Vec<RefreshedCookie>,
}

impl SessionRefresh {
    pub fn is_empty(&self) -> bool {
        self.fb_dtsg.is_none() && self.cookies.is_empty()
    }
}

/// Per-client authenticated session
pub struct SessionContext {
    user_id: String,
    base_url: Url,
    jar: Arc<Jar>,
    signing: RwLock<SigningState>,
}

impl SessionContext {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Snapshot of the current signing state
    pub fn signing(&self) -> SigningState {
        self.signing.read().clone()
    }

    /// Fields merged into every outgoing form
    pub fn signing_fields(&self) -> FormPayload {
        let signing = self.signing.read();
        let mut form = FormPayload::new();
        form.insert("__user", self.user_id.as_str());
        form.insert("__a", "1");
        if let Some(token) = &signing.fb_dtsg {
            form.insert("fb_dtsg", token.as_str());
        }
        if let Some(jazoest) = &signing.jazoest {
            form.insert("jazoest", jazoest.as_str());
        }
        form
    }

    /// `Cookie` header for a request to `url`
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }

    /// Record the `Set-Cookie` headers of a response
    pub fn store_response_cookies(&self, url: &Url, headers: &HeaderMap) {
        let mut set_cookies = headers.get_all(SET_COOKIE).iter();
        self.jar.set_cookies(&mut set_cookies, url);
    }

    /// Apply credentials the backend rotated in a response envelope
    pub fn apply_refresh(&self, refresh: &SessionRefresh) {
        if refresh.is_empty() {
            return;
        }

        for cookie in &refresh.cookies {
            self.jar.add_cookie_str(
                &format!("{}={}; Path=/", cookie.name, cookie.value),
                &self.base_url,
            );
        }

        if let Some(token) = &refresh.fb_dtsg {
            *self.signing.write() = SigningState::with_token(token.as_str());
        }

        debug!(
            cookies = refresh.cookies.len(),
            token_rotated = refresh.fb_dtsg.is_some(),
            "Session credentials refreshed"
        );
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.signing.read().fb_dtsg.is_some())
            .finish()
    }
}

/// Builder for [`SessionContext`]
#[derive(Debug, Default)]
pub struct SessionBuilder {
    user_id: Option<String>,
    base_url: Option<String>,
    fb_dtsg: Option<String>,
    cookies: Vec<String>,
    app_state: Option<AppState>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn fb_dtsg(mut self, token: impl Into<String>) -> Self {
        self.fb_dtsg = Some(token.into());
        self
    }

    /// Cookie for the base URL, e.g. `"xs=abc"`
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookies.push(cookie.into());
        self
    }

    pub fn app_state(mut self, app_state: AppState) -> Self {
        self.app_state = Some(app_state);
        self
    }

    pub fn build(self) -> Result<SessionContext> {
        let raw_base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_base)
            .map_err(|e| ApiError::config(format!("Invalid base URL '{}': {}", raw_base, e)))?;

        let jar = Jar::default();

        if let Some(state) = &self.app_state {
            for cookie in state.cookies() {
                jar.add_cookie_str(&cookie.to_cookie_string(), &cookie.origin()?);
            }
        }

        for cookie in &self.cookies {
            jar.add_cookie_str(cookie, &base_url);
        }

        let user_id = self
            .user_id
            .or_else(|| {
                self.app_state
                    .as_ref()
                    .and_then(|s| s.user_id())
                    .map(str::to_string)
            })
            .or_else(|| cookie_value(&self.cookies, USER_ID_COOKIE))
            .ok_or_else(|| {
                ApiError::config("No user id given and no c_user cookie in the session")
            })?;

        let signing = self
            .fb_dtsg
            .map(SigningState::with_token)
            .unwrap_or_default();

        Ok(SessionContext {
            user_id,
            base_url,
            jar: Arc::new(jar),
            signing: RwLock::new(signing),
        })
    }
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    cookies.iter().find_map(|cookie| {
        let pair = cookie.split(';').next()?;
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}
