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
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{
    auth::{require_admin, require_login},
    error::AppError,
    error_middleware::error_page_middleware,
    handlers,
    rate_limit::login_rate_limit_middleware,
    session::load_request_context,
    AppState,
};

pub fn create_router(state: AppState) -> Router {
    // require_login is layered last so it runs first: anonymous users get 401, not 403
    let admin = Router::new()
        .route(
            "/new-post",
            get(handlers::new_post_form).post(handlers::create_post),
        )
        .route(
            "/edit-post/{id}",
            get(handlers::edit_post_form).post(handlers::update_post),
        )
        .route("/delete/{id}", get(handlers::delete_post))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(require_login));

    let members = Router::new()
        .route("/comment/{id}", post(handlers::add_comment))
        .route_layer(middleware::from_fn(require_login));

    Router::new()
        // Health check
        .route("/health", get(health))
        // Static files
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .route("/", get(handlers::list_posts))
        .route("/post/{id}", get(handlers::show_post))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route(
            "/login",
            get(handlers::login_form)
                .post(handlers::login)
                .layer(middleware::from_fn_with_state(
                    state.login_rate_limiter.clone(),
                    login_rate_limit_middleware,
                )),
        )
        .route("/logout", get(handlers::logout))
        .merge(admin)
        .merge(members)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_page_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            load_request_context,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn not_found() -> AppError {
    AppError::not_found("The page you're looking for doesn't exist.")
}
