// Inkwell - A small multi-user blog built with Rust
// Copyright (C) 2025 Inkwell Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! One-shot notices carried to the next page in a signed cookie.

use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    SignedCookieJar,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

pub const FLASH_COOKIE: &str = "flash";

/// Queue a message for the next rendered page
pub fn push(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    let mut messages = peek(&jar);
    messages.push(message.into());

    let Ok(json) = serde_json::to_vec(&messages) else {
        return jar;
    };

    let cookie = Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(json)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    jar.add(cookie)
}

/// Remove and return every queued message
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<String>) {
    let messages = peek(&jar);
    if messages.is_empty() {
        return (jar, messages);
    }

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}

/// A tampered or malformed cookie reads as no messages
fn peek(jar: &SignedCookieJar) -> Vec<String> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| URL_SAFE_NO_PAD.decode(cookie.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::cookie_key_from_secret;
    use pretty_assertions::assert_eq;

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(cookie_key_from_secret("flash-test"))
    }

    #[test]
    fn test_take_empty() {
        let (_, messages) = take(jar());
        assert!(messages.is_empty());
    }

    #[test]
    fn test_push_then_take_once() {
        let jar = push(jar(), "Logged in successfully.");
        let jar = push(jar, "Second, with; odd = chars");

        let (jar, messages) = take(jar);
        assert_eq!(
            messages,
            vec!["Logged in successfully.", "Second, with; odd = chars"]
        );

        let (_, again) = take(jar);
        assert!(again.is_empty());
    }
}
