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
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;

use crate::{
    error::AppError,
    session::RequestContext,
    template_context::{page_context, render},
    AppState,
};

pub async fn about(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, context) = page_context(&request, jar);
    Ok((jar, render(&state, "about.html", &context)?).into_response())
}

pub async fn contact(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, context) = page_context(&request, jar);
    Ok((jar, render(&state, "contact.html", &context)?).into_response())
}
