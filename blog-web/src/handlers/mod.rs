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

pub mod auth;
pub mod comments;
pub mod pages;
pub mod posts;

pub use auth::{login, login_form, logout, register, register_form};
pub use comments::add_comment;
pub use pages::{about, contact};
pub use posts::{
    create_post, delete_post, edit_post_form, list_posts, new_post_form, show_post, update_post,
};
