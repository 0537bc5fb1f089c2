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

use axum::response::Html;
use axum_extra::extract::SignedCookieJar;
use chrono::Datelike;
use tera::Context;

use crate::{error::AppError, flash, session::RequestContext, AppState};

/// Variables every page needs: login state for the nav bar, flash messages and
/// the CSRF token for forms
pub fn base_context(request: &RequestContext, messages: &[String]) -> Context {
    let mut context = Context::new();

    context.insert("logged_in", &request.is_authenticated());
    context.insert("is_admin", &request.is_admin());
    if let Some(user) = &request.user {
        context.insert("current_user", user);
    }
    context.insert("messages", messages);
    context.insert("csrf_token", &request.csrf_token);
    context.insert("year", &chrono::Utc::now().year());

    context
}

/// [`base_context`] with the pending flash messages, which are consumed
pub fn page_context(request: &RequestContext, jar: SignedCookieJar) -> (SignedCookieJar, Context) {
    let (jar, messages) = flash::take(jar);
    (jar, base_context(request, &messages))
}

pub fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, AppError> {
    let html = state.templates.render(template, context).map_err(|e| {
        AppError::internal_server_error("Failed to render page")
            .with_details(format!("{}: {:?}", template, e))
    })?;
    Ok(Html(html))
}
