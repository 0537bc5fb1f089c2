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
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use tera::Context;

use crate::{
    csrf::CsrfForm,
    error::AppError,
    flash,
    forms::{validate_form, FieldErrors, LoginForm, RegisterForm},
    services::{self, AccountError},
    session::{end_session, start_session, RequestContext},
    template_context::{base_context, page_context, render},
    AppState,
};

fn form_context(
    request: &RequestContext,
    form: &impl serde::Serialize,
    errors: &FieldErrors,
    error: Option<&str>,
) -> Context {
    let mut context = base_context(request, &[]);
    context.insert("form", form);
    context.insert("errors", errors);
    if let Some(error) = error {
        context.insert("error", error);
    }
    context
}

/// Display the registration form
pub async fn register_form(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, mut context) = page_context(&request, jar);
    context.insert("form", &RegisterForm::default());
    context.insert("errors", &FieldErrors::new());

    Ok((jar, render(&state, "register.html", &context)?).into_response())
}

/// Create the account and log it in
pub async fn register(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
    CsrfForm(form): CsrfForm<RegisterForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = validate_form(&form) {
        let context = form_context(&request, &form, &errors, None);
        return Ok(render(&state, "register.html", &context)?.into_response());
    }

    let user = match services::register(
        &state.db,
        form.email.trim(),
        &form.password,
        form.name.trim(),
    )
    .await
    {
        Ok(user) => user,
        Err(AccountError::Internal(e)) => return Err(e.into()),
        Err(e) => {
            let context =
                form_context(&request, &form, &FieldErrors::new(), Some(&e.to_string()));
            return Ok(render(&state, "register.html", &context)?.into_response());
        }
    };

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal_server_error("Registered user has no id"))?;
    let jar = start_session(&state, jar, user_id).await?;

    Ok((jar, Redirect::to("/")).into_response())
}

/// Display the login form
pub async fn login_form(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let (jar, mut context) = page_context(&request, jar);
    context.insert("form", &LoginForm::default());
    context.insert("errors", &FieldErrors::new());

    Ok((jar, render(&state, "login.html", &context)?).into_response())
}

/// Check credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    request: RequestContext,
    jar: SignedCookieJar,
    CsrfForm(form): CsrfForm<LoginForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = validate_form(&form) {
        let context = form_context(&request, &form, &errors, None);
        return Ok(render(&state, "login.html", &context)?.into_response());
    }

    let user = match services::authenticate(&state.db, form.email.trim(), &form.password).await {
        Ok(user) => user,
        Err(AccountError::Internal(e)) => return Err(e.into()),
        Err(e) => {
            tracing::info!(email = %form.email.trim(), reason = %e, "Login failed");
            let context =
                form_context(&request, &form, &FieldErrors::new(), Some(&e.to_string()));
            return Ok(render(&state, "login.html", &context)?.into_response());
        }
    };

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal_server_error("Stored user has no id"))?;
    let jar = start_session(&state, jar, user_id).await?;
    let jar = flash::push(jar, "Logged in successfully.");

    Ok((jar, Redirect::to("/")).into_response())
}

/// Handle logout
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let jar = end_session(&state, jar).await?;
    Ok((jar, Redirect::to("/")).into_response())
}
