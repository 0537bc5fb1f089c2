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

use anyhow::Result;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    SignedCookieJar,
};
use blog_core::models::{session::Session, user::User};
use blog_db::repositories::{SessionRepository, UserRepository};
use std::convert::Infallible;

use crate::{csrf, AppState};

pub const SESSION_COOKIE: &str = "session_id";

/// Who is making the current request.
///
/// Built once per request by [`load_request_context`] from the signed session
/// cookie. Anonymous visitors have no user but still get a CSRF token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<User>,
    /// Expected value of the `csrf_token` field on submitted forms
    pub csrf_token: String,
}

impl RequestContext {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Resolve the session cookie to a user and attach the result to the request
pub async fn load_request_context(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let mut context = match resolve_context(&state, &jar).await {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("Failed to resolve session: {:?}", e);
            RequestContext::default()
        }
    };

    let mut jar = jar;
    if context.csrf_token.is_empty() {
        let (anonymous_jar, token) = csrf::anonymous_token(jar);
        jar = anonymous_jar;
        context.csrf_token = token;
    }

    request.extensions_mut().insert(context);
    let response = next.run(request).await;
    (jar, response).into_response()
}

async fn resolve_context(state: &AppState, jar: &SignedCookieJar) -> Result<RequestContext> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(RequestContext::default());
    };
    let session_repo = SessionRepository::new(state.db.clone());
    let Some(session) = session_repo.find_by_id(cookie.value()).await? else {
        return Ok(RequestContext::default());
    };

    if session.is_expired() {
        tracing::debug!(user_id = session.user_id, "Ignoring expired session");
        return Ok(RequestContext::default());
    }

    let user_repo = UserRepository::new(state.db.clone());
    let Some(user) = user_repo.find_by_id(session.user_id).await? else {
        return Ok(RequestContext::default());
    };

    Ok(RequestContext {
        user: Some(user),
        csrf_token: session.csrf_token,
    })
}

/// Log `user_id` in: store a fresh session and set the signed cookie.
/// Any session the browser already carried is discarded first.
pub async fn start_session(
    state: &AppState,
    jar: SignedCookieJar,
    user_id: i64,
) -> Result<SignedCookieJar> {
    let jar = end_session(state, jar).await?;

    let session = Session::new(
        user_id,
        state.config.session_lifetime(),
        csrf::generate_token(),
    );
    SessionRepository::new(state.db.clone())
        .create(&session)
        .await?;

    tracing::info!(user_id, "User logged in");

    let cookie = Cookie::build((SESSION_COOKIE, session.id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok(jar.add(cookie))
}

/// Log out. Safe to call without a session.
pub async fn end_session(state: &AppState, jar: SignedCookieJar) -> Result<SignedCookieJar> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(jar);
    };

    SessionRepository::new(state.db.clone())
        .delete(cookie.value())
        .await?;

    Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}
