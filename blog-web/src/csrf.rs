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

//! Cross-site request forgery tokens.
//!
//! Logged-in visitors carry the token stored on their session row; anonymous
//! visitors get one in a signed cookie. Every state-changing request must echo
//! it back, either as a hidden form field or as a query parameter.

use axum::{
    extract::{FromRequest, Request},
    Form,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    SignedCookieJar,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{error::AppError, session::RequestContext};

pub const CSRF_FIELD: &str = "csrf_token";
pub const CSRF_COOKIE: &str = "csrf";
const CSRF_TOKEN_LENGTH: usize = 32;

const REJECTED: &str = "The form has expired. Reload the page and try again.";

pub fn generate_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_LENGTH];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// An empty expected token never matches
pub fn verify(expected: &str, provided: &str) -> bool {
    !expected.is_empty() && expected == provided
}

/// Reject the request unless `provided` matches the visitor's token
pub fn require_token(request: &RequestContext, provided: &str) -> Result<(), AppError> {
    if verify(&request.csrf_token, provided) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = ?request.user.as_ref().and_then(|u| u.id),
            "Rejected request with a missing or stale CSRF token"
        );
        Err(AppError::forbidden(REJECTED))
    }
}

/// Token for a visitor without a session, minted on first sight
pub fn anonymous_token(jar: SignedCookieJar) -> (SignedCookieJar, String) {
    if let Some(token) = jar
        .get(CSRF_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
    {
        return (jar, token);
    }

    let token = generate_token();
    let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), token)
}

/// A submitted form that carries the CSRF token
pub trait CsrfProtected {
    fn csrf_token(&self) -> &str;
}

/// Token passed in the query string of a link, e.g. `/delete/3?csrf_token=...`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsrfQuery {
    pub csrf_token: String,
}

/// [`Form`] that only extracts when its token matches the visitor's
pub struct CsrfForm<T>(pub T);

impl<S, T> FromRequest<S> for CsrfForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + CsrfProtected,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default();

        let Form(form) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::new(rejection.status(), rejection.body_text()))?;

        require_token(&request, form.csrf_token())?;
        Ok(CsrfForm(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::state::cookie_key_from_secret;

    #[derive(Debug, Deserialize)]
    struct Note {
        #[serde(default)]
        csrf_token: String,
        text: String,
    }

    impl CsrfProtected for Note {
        fn csrf_token(&self) -> &str {
            &self.csrf_token
        }
    }

    fn form_request(context: Option<RequestContext>, body: &'static str) -> Request {
        let mut request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(axum::body::Body::from(body))
            .unwrap();
        if let Some(context) = context {
            request.extensions_mut().insert(context);
        }
        request
    }

    fn context_with(token: &str) -> RequestContext {
        RequestContext {
            user: None,
            csrf_token: token.to_string(),
        }
    }

    #[test]
    fn test_token_generation() {
        let a = generate_token();
        let b = generate_token();

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_verify() {
        assert!(verify("abc", "abc"));
        assert!(!verify("abc", "abd"));
        assert!(!verify("abc", ""));
        assert!(!verify("", ""));
    }

    #[test]
    fn test_anonymous_token_is_reused() {
        let jar = SignedCookieJar::new(cookie_key_from_secret("csrf-test"));
        let (jar, first) = anonymous_token(jar);
        let (_jar, second) = anonymous_token(jar);

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_form_with_matching_token() {
        let request = form_request(Some(context_with("t0k3n")), "csrf_token=t0k3n&text=hi");

        let CsrfForm(note) = CsrfForm::<Note>::from_request(request, &()).await.unwrap();
        assert_eq!(note.text, "hi");
    }

    #[tokio::test]
    async fn test_form_without_token_is_forbidden() {
        let request = form_request(Some(context_with("t0k3n")), "text=hi");

        let err = CsrfForm::<Note>::from_request(request, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_form_with_wrong_token_is_forbidden() {
        let request = form_request(Some(context_with("t0k3n")), "csrf_token=guess&text=hi");

        let err = CsrfForm::<Note>::from_request(request, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_form_outside_request_context_is_forbidden() {
        let request = form_request(None, "csrf_token=&text=hi");

        let err = CsrfForm::<Note>::from_request(request, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
