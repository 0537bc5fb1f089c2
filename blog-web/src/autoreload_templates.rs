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

use anyhow::{anyhow, Result};
use std::sync::{Arc, RwLock};
use tera::{Context, Tera};

/// A wrapper around Tera that can reload templates in development mode
#[derive(Clone)]
pub enum TemplateEngine {
    /// Templates loaded once at startup
    Static(Arc<Tera>),
    /// Templates re-read from disk before every render
    Reloadable {
        templates_dir: String,
        cached: Arc<RwLock<Tera>>,
    },
}

impl TemplateEngine {
    pub fn new(templates_dir: &str, development_mode: bool) -> Result<Self> {
        let tera = Self::create_tera_instance(templates_dir)?;

        if development_mode {
            tracing::info!("Template hot reload enabled (development mode)");
            Ok(Self::Reloadable {
                templates_dir: templates_dir.to_string(),
                cached: Arc::new(RwLock::new(tera)),
            })
        } else {
            tracing::info!("Templates loaded once (production mode)");
            Ok(Self::Static(Arc::new(tera)))
        }
    }

    fn create_tera_instance(templates_dir: &str) -> Result<Tera> {
        let pattern = format!("{}/**/*.html", templates_dir);
        let tera = Tera::new(&pattern)?;
        Ok(tera)
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        match self {
            Self::Static(tera) => Ok(tera.render(template_name, context)?),
            Self::Reloadable {
                templates_dir,
                cached,
            } => {
                match Self::create_tera_instance(templates_dir) {
                    Ok(fresh) => {
                        if let Ok(mut guard) = cached.write() {
                            *guard = fresh;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to reload templates: {}. Using cached version.", e);
                    }
                }

                let guard = cached
                    .read()
                    .map_err(|_| anyhow!("Template cache lock poisoned"))?;
                Ok(guard.render(template_name, context)?)
            }
        }
    }
}
