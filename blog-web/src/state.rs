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

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;

use crate::autoreload_templates::TemplateEngine;
use crate::config::Config;
use crate::rate_limit::SharedRateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub templates: TemplateEngine,
    pub config: Config,
    pub cookie_key: Key,
    pub login_rate_limiter: SharedRateLimiter,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        templates: TemplateEngine,
        config: Config,
        login_rate_limiter: SharedRateLimiter,
    ) -> Self {
        let cookie_key = cookie_key_from_secret(&config.secret_key);

        Self {
            db,
            templates,
            config,
            cookie_key,
            login_rate_limiter,
        }
    }
}

/// Stretch the configured secret to the 64 bytes the cookie key needs
pub fn cookie_key_from_secret(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
