//! HTTP backend for a phonebook (`/api/persons`) and a notes list
//! (`/api/notes`).

use std::{path::PathBuf, sync::Arc};

pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod model;
pub mod request;
pub mod response;
pub mod route;
pub mod store;

pub use route::create_router;

use store::Store;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Directory holding the prebuilt frontend, if any.
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, static_dir: Option<PathBuf>) -> Self {
        AppState { store, static_dir }
    }
}
