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

use anyhow::{Context, Result};
use std::path::Path;

use crate::autoreload_templates::TemplateEngine;

/// Templates shipped with the binary, written out when missing
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("make-post.html", include_str!("../templates/make-post.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("contact.html", include_str!("../templates/contact.html")),
    ("error.html", include_str!("../templates/error.html")),
];

pub fn init_templates(templates_dir: &str, development_mode: bool) -> Result<TemplateEngine> {
    std::fs::create_dir_all(templates_dir).context("Failed to create templates directory")?;

    create_default_templates(templates_dir)?;

    TemplateEngine::new(templates_dir, development_mode)
}

/// Existing files are left alone so local edits survive restarts
fn create_default_templates(templates_dir: &str) -> Result<()> {
    let base_dir = Path::new(templates_dir);

    for (name, contents) in DEFAULT_TEMPLATES {
        let path = base_dir.join(name);
        if !path.exists() {
            std::fs::write(&path, contents)
                .with_context(|| format!("Failed to create template {}", name))?;
        }
    }

    Ok(())
}
