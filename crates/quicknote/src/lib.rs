//! QuickNote - create, list, search, edit and delete short local notes.
//!
//! The screens bind to the state holders in [`state`]; [`App`] wires them to
//! a SQLite database and a private image directory.

mod app;
pub mod config;
pub mod logging;
pub mod state;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::Config;
pub use quicknote_core::{Error, Note};
pub use quicknote_files::{image_exists, image_size_in_mb, remove_image, ImageError, ImageStore};
