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
    extract::{Path, State},
    response::Redirect,
};
use blog_core::models::comment::Comment;
use blog_db::repositories::{CommentRepository, PostRepository};

use crate::{
    auth::AuthenticatedUser,
    csrf::CsrfForm,
    error::AppError,
    forms::{validate_form, CommentForm},
    AppState,
};

/// Attach a comment from the current user to a post
pub async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    AuthenticatedUser(user): AuthenticatedUser,
    CsrfForm(form): CsrfForm<CommentForm>,
) -> Result<Redirect, AppError> {
    if validate_form(&form).is_err() {
        return Ok(Redirect::to("/"));
    }

    if PostRepository::new(state.db.clone())
        .find_by_id(post_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Post not found"));
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal_server_error("Stored user has no id"))?;
    let comment = Comment::new(form.sanitized_text(), user_id, post_id)?;
    let comment_id = CommentRepository::new(state.db.clone())
        .create(&comment)
        .await?;

    tracing::debug!(comment_id, post_id, user_id, "Comment added");
    Ok(Redirect::to(&format!("/post/{}", post_id)))
}
