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

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use blog_core::models::user::User;

use crate::{error::AppError, session::RequestContext};

/// The logged-in user; rejects anonymous requests with 401
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = RequestContext::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        context
            .user
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::unauthorized("Please log in to access this page"))
    }
}

/// Route layer: only logged-in users get through
pub async fn require_login(
    context: RequestContext,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !context.is_authenticated() {
        tracing::debug!(path = %request.uri().path(), "Anonymous request to protected route");
        return Err(AppError::unauthorized("Please log in to access this page"));
    }

    Ok(next.run(request).await)
}

/// Route layer: only the admin gets through.
///
/// Layer it inside [`require_login`] so anonymous requests are answered with
/// 401 before the admin check runs.
pub async fn require_admin(
    context: RequestContext,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match &context.user {
        None => Err(AppError::unauthorized("Please log in to access this page")),
        Some(user) if user.is_admin() => Ok(next.run(request).await),
        Some(user) => {
            tracing::warn!(user_id = ?user.id, path = %request.uri().path(), "Non-admin denied");
            Err(AppError::forbidden("Only Admin"))
        }
    }
}
