//! One-shot page notifications carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
            FlashLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Queue a message for the next rendered page.
pub fn push(jar: CookieJar, level: FlashLevel, message: impl Into<String>) -> CookieJar {
    let mut flashes = pending(&jar);
    flashes.push(Flash::new(level, message));
    store(jar, &flashes)
}

/// Drain queued messages, clearing the cookie if one was sent.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Flash>) {
    let flashes = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, flashes);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flashes)
}

fn pending(jar: &CookieJar) -> Vec<Flash> {
    // A tampered or stale cookie just means nothing to show.
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| hex::decode(cookie.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

fn store(jar: CookieJar, flashes: &[Flash]) -> CookieJar {
    let payload = match serde_json::to_vec(flashes) {
        Ok(bytes) => hex::encode(bytes),
        Err(e) => {
            tracing::warn!("Dropping flash messages: {:?}", e);
            return jar;
        }
    };
    let cookie = Cookie::build((FLASH_COOKIE, payload))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}
