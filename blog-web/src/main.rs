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

use anyhow::Result;
use blog_db::{init_database, repositories::SessionRepository};
use blog_web::{
    config::Config, rate_limit::create_login_rate_limiter, routes, state::AppState,
    templates::init_templates,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Starting Inkwell blog server");

    // Initialize database
    info!("Initializing database: {}", config.database_url);
    let db = init_database(&config.database_url).await?;

    let purged = SessionRepository::new(db.clone()).delete_expired().await?;
    if purged > 0 {
        info!("Removed {} expired sessions", purged);
    }

    // Initialize templates
    info!("Loading templates from: {}", config.templates_dir);
    let templates = init_templates(&config.templates_dir, config.development_mode)?;

    std::fs::create_dir_all(&config.static_dir)?;

    let login_rate_limiter = create_login_rate_limiter(config.login_attempts_per_minute);
    let state = AppState::new(db, templates, config.clone(), login_rate_limiter);

    let app = routes::create_router(state);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
