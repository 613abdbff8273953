//! Shared headless browser lifecycle
//!
//! Exactly one Chromium process per host process: lazily launched on
//! first use, reused across requests, torn down only at shutdown. The
//! launch happens under the manager's lock so concurrent first-callers
//! await the single in-flight launch instead of spawning duplicates.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use shared::CanonicalReceipt;

use crate::error::{RenderError, RenderResult};
use crate::layout;

// Data URLs fire no font-load events; give layout a moment to settle
// before measuring.
const SETTLE: Duration = Duration::from_millis(100);

/// Owner of the process-wide headless browser
pub struct BrowserManager {
    slot: Mutex<Option<Arc<Browser>>>,
    chrome_path: Option<PathBuf>,
}

impl BrowserManager {
    /// Create a manager; the browser is not launched until first use.
    ///
    /// `chrome_path` overrides the crate's own executable discovery.
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self {
            slot: Mutex::new(None),
            chrome_path,
        }
    }

    /// Get the shared browser, launching it if this is the first call
    async fn acquire(&self) -> RenderResult<Arc<Browser>> {
        let mut slot = self.slot.lock().await;
        if let Some(browser) = slot.as_ref() {
            return Ok(browser.clone());
        }

        info!("launching headless browser");
        let path = self.chrome_path.clone();
        let browser = tokio::task::spawn_blocking(move || launch(path))
            .await
            .map_err(|e| RenderError::Launch(format!("Task join failed: {e}")))??;

        let browser = Arc::new(browser);
        *slot = Some(browser.clone());
        Ok(browser)
    }

    /// Render a receipt as a content-sized 80mm PDF
    ///
    /// Opens a fresh tab in the shared browser, measures the laid-out
    /// content, emits a PDF page of exactly that height, and closes the
    /// tab. A failure here leaves the shared browser running.
    #[instrument(skip(self, receipt), fields(items = receipt.items.len()))]
    pub async fn render_receipt(
        &self,
        receipt: &CanonicalReceipt,
        currency: &str,
    ) -> RenderResult<Vec<u8>> {
        let browser = self.acquire().await?;
        let html = layout::receipt_html(receipt, currency);

        tokio::task::spawn_blocking(move || render_page(&browser, &html))
            .await
            .map_err(|e| RenderError::Page(format!("Task join failed: {e}")))?
    }

    /// Stop the shared browser, if it was ever started
    ///
    /// Registered with the host's shutdown path; dropping the last
    /// handle kills the Chromium process.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            info!("headless browser stopped");
        }
    }
}

fn launch(path: Option<PathBuf>) -> RenderResult<Browser> {
    let mut builder = LaunchOptions::default_builder();
    builder.headless(true);
    if let Some(p) = path {
        builder.path(Some(p));
    }
    let options = builder
        .build()
        .map_err(|e| RenderError::Launch(e.to_string()))?;

    Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))
}

fn render_page(browser: &Browser, html: &str) -> RenderResult<Vec<u8>> {
    let tab = browser
        .new_tab()
        .map_err(|e| RenderError::Page(e.to_string()))?;

    let result = print_tab(&tab, html);

    // Tabs are per-request; closing failures must not mask the result
    if let Err(e) = tab.close(true) {
        warn!(error = %e, "tab close failed");
    }

    result
}

fn print_tab(tab: &Arc<Tab>, html: &str) -> RenderResult<Vec<u8>> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(html);
    let url = format!("data:text/html;base64,{encoded}");

    tab.navigate_to(&url)
        .and_then(|t| t.wait_until_navigated())
        .map_err(|e| RenderError::Page(e.to_string()))?;

    std::thread::sleep(SETTLE);

    let measured = tab
        .evaluate(layout::MEASURE_JS, false)
        .map_err(|e| RenderError::Page(e.to_string()))?;
    let content_px = measured
        .value
        .as_ref()
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let height_mm = layout::page_height_mm(content_px);
    debug!(content_px, height_mm, "receipt content measured");

    tab.print_to_pdf(Some(PrintToPdfOptions {
        print_background: Some(true),
        scale: Some(1.0),
        paper_width: Some(layout::PAGE_WIDTH_MM / layout::MM_PER_INCH),
        paper_height: Some(height_mm / layout::MM_PER_INCH),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        ..Default::default()
    }))
    .map_err(|e| RenderError::Page(e.to_string()))
}
