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
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use blog_core::models::post::BlogPost;
use blog_db::repositories::{is_unique_violation, CommentRepository, PostRepository};

use crate::{
    auth::AuthenticatedUser,
    csrf::{require_token, CsrfForm, CsrfQuery},
    error::AppError,
    forms::{validate_form, FieldErrors, PostForm},
    session::RequestContext,
    template_context::{base_context, page_context, render},
    AppState,
};

const DUPLICATE_TITLE: &str = "A post with this title already exists";

async fn find_post(state: &AppState, id: i64) -> Result<BlogPost, AppError> {
    PostRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))
}

/// Re-render the post editor with the submitted values
fn post_editor(
    state: &AppState,
    request: &RequestContext,
    form: &PostForm,
    errors: &FieldErrors,
    action: &str,
    is_edit: bool,
) -> Result<Html<String>, AppError> {
    let mut context = base_context(request, &[]);
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("action", action);
    context.insert("is_edit", &is_edit);
    render(state, "make-post.html", &context)
}

/// A title is taken when another post already uses it
async fn title_taken(state: &AppState, title: &str, except: Option<i64>) -> Result<bool, AppError> {
    let existing = PostRepository::new(state.db.clone())
        .find_by_title(title)
        .await?;
    Ok(existing.is_some_and(|post| post.id != except))
}

/// Editor showing only the duplicate-title message
fn duplicate_title_editor(
    state: &AppState,
    request: &RequestContext,
    form: &PostForm,
    action: &str,
    is_edit: bool,
) -> Result<Response, AppError> {
    let mut errors = FieldErrors::new();
    errors.insert("title".to_string(), DUPLICATE_TITLE.to_string());
    Ok(post_editor(state, request, form, &errors, action, is_edit)?.into_response())
}

/// `None` when a concurrent request took the title after [`title_taken`] said
/// it was free
fn unless_title_taken<T>(result: anyhow::Result<T>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Home page: every post, oldest first
pub async fn list_posts(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let posts = PostRepository::new(state.db.clone()).list_all().await?;

    let (jar, mut context) = page_context(&request, jar);
    context.insert("all_posts", &posts);

    Ok((jar, render(&state, "index.html", &context)?).into_response())
}

/// A single post with its comments
pub async fn show_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    request: RequestContext,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let post = find_post(&state, post_id).await?;
    let comments = CommentRepository::new(state.db.clone())
        .list_for_post(post_id)
        .await?;

    let (jar, mut context) = page_context(&request, jar);
    context.insert("post", &post);
    context.insert("comments", &comments);

    Ok((jar, render(&state, "post.html", &context)?).into_response())
}

/// Empty editor for a new post
pub async fn new_post_form(
    State(state): State<AppState>,
    request: RequestContext,
) -> Result<Html<String>, AppError> {
    post_editor(
        &state,
        &request,
        &PostForm::default(),
        &FieldErrors::new(),
        "/new-post",
        false,
    )
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: RequestContext,
    CsrfForm(form): CsrfForm<PostForm>,
) -> Result<Response, AppError> {
    let mut errors = validate_form(&form).err().unwrap_or_default();
    if !errors.contains_key("title") && title_taken(&state, form.title.trim(), None).await? {
        errors.insert("title".to_string(), DUPLICATE_TITLE.to_string());
    }
    if !errors.is_empty() {
        return Ok(post_editor(&state, &request, &form, &errors, "/new-post", false)?.into_response());
    }

    let today = chrono::Local::now().date_naive();
    let post = BlogPost::new(form.clone().into_content(), &user, today)?;
    let created = PostRepository::new(state.db.clone()).create(&post).await;
    let Some(post_id) = unless_title_taken(created)? else {
        return duplicate_title_editor(&state, &request, &form, "/new-post", false);
    };

    tracing::info!(post_id, user_id = post.user_id, title = %post.title, "Post created");
    Ok(Redirect::to("/").into_response())
}

/// Editor pre-filled with the stored post
pub async fn edit_post_form(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    request: RequestContext,
) -> Result<Html<String>, AppError> {
    let post = find_post(&state, post_id).await?;

    post_editor(
        &state,
        &request,
        &PostForm::from(post.content()),
        &FieldErrors::new(),
        &format!("/edit-post/{}", post_id),
        true,
    )
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    request: RequestContext,
    CsrfForm(form): CsrfForm<PostForm>,
) -> Result<Response, AppError> {
    let mut post = find_post(&state, post_id).await?;
    let action = format!("/edit-post/{}", post_id);

    let mut errors = validate_form(&form).err().unwrap_or_default();
    if !errors.contains_key("title")
        && title_taken(&state, form.title.trim(), Some(post_id)).await?
    {
        errors.insert("title".to_string(), DUPLICATE_TITLE.to_string());
    }
    if !errors.is_empty() {
        return Ok(post_editor(&state, &request, &form, &errors, &action, true)?.into_response());
    }

    post.apply(form.clone().into_content());
    let updated = PostRepository::new(state.db.clone()).update(&post).await;
    if unless_title_taken(updated)?.is_none() {
        return duplicate_title_editor(&state, &request, &form, &action, true);
    }

    tracing::info!(post_id, "Post updated");
    Ok(Redirect::to(&format!("/post/{}", post_id)).into_response())
}

/// Remove a post together with its comments. Reached through a plain link, so
/// the CSRF token travels in the query string.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    request: RequestContext,
    Query(query): Query<CsrfQuery>,
) -> Result<Redirect, AppError> {
    require_token(&request, &query.csrf_token)?;

    let deleted = PostRepository::new(state.db.clone()).delete(post_id).await?;
    if !deleted {
        return Err(AppError::not_found("Post not found"));
    }

    tracing::info!(post_id, "Post deleted");
    Ok(Redirect::to("/"))
}
