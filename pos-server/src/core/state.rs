//! Shared application state
//!
//! Cheap to clone: configuration and the browser manager sit behind
//! Arcs. The browser manager is the only longer-lived resource; every
//! other artifact is per-request.

use std::sync::Arc;

use sari_pdf::BrowserManager;

use crate::core::Config;

/// Per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub browser: Arc<BrowserManager>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let browser = BrowserManager::new(config.chrome_path.clone());
        Self {
            config: Arc::new(config),
            browser: Arc::new(browser),
        }
    }
}
