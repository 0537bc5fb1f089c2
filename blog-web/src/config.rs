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

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "blog.toml";
pub const ENV_PREFIX: &str = "BLOG_";

/// Upper bound for `session_lifetime_hours`: one year
pub const MAX_SESSION_LIFETIME_HOURS: i64 = 24 * 366;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Signs the session and flash cookies
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Reload templates from disk on every render
    #[serde(default)]
    pub development_mode: bool,

    #[serde(default = "default_session_lifetime_hours")]
    pub session_lifetime_hours: i64,

    #[serde(default = "default_login_attempts_per_minute")]
    pub login_attempts_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: default_database_url(),
            secret_key: default_secret_key(),
            templates_dir: default_templates_dir(),
            static_dir: default_static_dir(),
            development_mode: false,
            session_lifetime_hours: default_session_lifetime_hours(),
            login_attempts_per_minute: default_login_attempts_per_minute(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `blog.toml`, overridden by `BLOG_*` variables
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let config: Config = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_SESSION_LIFETIME_HOURS).contains(&self.session_lifetime_hours) {
            anyhow::bail!(
                "session_lifetime_hours must be between 1 and {}, got {}",
                MAX_SESSION_LIFETIME_HOURS,
                self.session_lifetime_hours
            );
        }
        Ok(())
    }

    /// Out-of-range values are clamped; [`Config::validate`] reports them
    pub fn session_lifetime(&self) -> chrono::TimeDelta {
        let hours = self
            .session_lifetime_hours
            .clamp(1, MAX_SESSION_LIFETIME_HOURS);
        chrono::TimeDelta::try_hours(hours).unwrap_or_else(|| {
            chrono::TimeDelta::hours(blog_core::models::session::DEFAULT_SESSION_LIFETIME_HOURS)
        })
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_database_url() -> String {
    "sqlite:blog.db".to_string()
}

fn default_secret_key() -> String {
    "8BYkEfBA6O6donzWlSihBXox7C0sKR6b".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_session_lifetime_hours() -> i64 {
    blog_core::models::session::DEFAULT_SESSION_LIFETIME_HOURS
}

fn default_login_attempts_per_minute() -> u32 {
    30
}
