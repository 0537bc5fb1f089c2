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
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::ErrorMessage,
    session::RequestContext,
    template_context::base_context,
    AppState,
};

/// Replace bare 4xx/5xx bodies with the rendered error page
pub async fn error_page_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let context = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let message = response.extensions().get::<ErrorMessage>().cloned();
    match render_error_page(&state, &context, status, message) {
        Some(mut page) => {
            carry_headers(response.headers(), page.headers_mut());
            page
        }
        None => response,
    }
}

/// Keep headers such as `Allow` or `Set-Cookie`; the body headers belong to the page
fn carry_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            to.append(name.clone(), value.clone());
        }
    }
}

fn render_error_page(
    state: &AppState,
    request: &RequestContext,
    status: StatusCode,
    message: Option<ErrorMessage>,
) -> Option<Response> {
    let (title, default_message) = match status {
        StatusCode::NOT_FOUND => ("Page Not Found", "The page you're looking for doesn't exist."),
        StatusCode::UNAUTHORIZED => ("Login Required", "Please log in to access this page"),
        StatusCode::FORBIDDEN => ("Access Denied", "You don't have permission to access this page."),
        StatusCode::TOO_MANY_REQUESTS => ("Too Many Requests", "Please wait a moment and try again."),
        StatusCode::INTERNAL_SERVER_ERROR => (
            "Server Error",
            "Something went wrong on our end. Please try again later.",
        ),
        _ => (
            status.canonical_reason().unwrap_or("Error"),
            "The request could not be completed.",
        ),
    };

    let mut context = base_context(request, &[]);
    context.insert("error_code", &status.as_u16());
    context.insert("error_title", title);
    context.insert(
        "error_message",
        &message.map_or_else(|| default_message.to_string(), |m| m.0),
    );

    match state.templates.render("error.html", &context) {
        Ok(html) => {
            let mut response = (status, html).into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            Some(response)
        }
        Err(e) => {
            tracing::error!("Failed to render error template: {:?}", e);
            None
        }
    }
}
