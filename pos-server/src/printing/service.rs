//! Print orchestration
//!
//! One request, one pass: normalize the payload, encode, rasterize the
//! logo, dispatch with fallback. Nothing here is persisted; a failed
//! print is reported synchronously and the caller decides what's next.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, instrument, warn};

use sari_printer::{
    local_transport, rasterize, Dispatcher, DispatchReport, NetworkTransport, PrintTarget,
    Transport,
};
use shared::ReceiptBuilder;

use crate::core::Config;
use crate::printing::ReceiptRenderer;
use crate::utils::ApiError;

/// Result of a completed print request
pub struct PrintOutcome {
    pub report: DispatchReport,
    pub item_count: usize,
}

/// Thermal-path print service
pub struct PrintService {
    config: Arc<Config>,
}

impl PrintService {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Run a raw transaction payload through the full thermal path
    #[instrument(skip(self, payload))]
    pub async fn print_receipt(&self, payload: &Value) -> Result<PrintOutcome, ApiError> {
        let receipt = ReceiptBuilder::build(payload, self.config.store_info())?;
        let requested = payload.get("printerName").and_then(Value::as_str);

        // Discovery side-channel: probe a requested destination before
        // dispatch. Advisory only; the fallback chain still runs.
        if let Some(name) = requested {
            if !sari_printer::test_printer_connection(name).await {
                warn!(printer = name, "requested printer did not answer status probe");
            }
        }

        // The logo is re-read from disk every print so edits show up
        // without a restart; a missing file just drops the logo.
        let logo = rasterize(&self.config.logo_path, self.config.logo_width);

        let data = ReceiptRenderer::new(&receipt, &self.config.currency_symbol)
            .render(Some(&logo), self.config.kick_drawer);

        let report = self.dispatcher(requested).dispatch(&data).await?;
        info!(
            method = %report.method,
            printer = %report.printer_name,
            items = receipt.items.len(),
            "receipt printed"
        );

        Ok(PrintOutcome {
            report,
            item_count: receipt.items.len(),
        })
    }

    /// Ordered transport plan for this request
    ///
    /// Network first when configured (with the configured timeout and
    /// settle delay), then the local path; local-only otherwise.
    fn dispatcher(&self, requested: Option<&str>) -> Dispatcher {
        match self.config.print_target(requested) {
            PrintTarget::Network { host, port } => {
                let network = NetworkTransport::new(host, port)
                    .with_timeout(Duration::from_millis(self.config.printer_timeout_ms))
                    .with_settle(Duration::from_millis(self.config.printer_settle_ms));
                let attempts: Vec<Box<dyn Transport>> = vec![
                    Box::new(network),
                    local_transport(self.config.fallback_printer(requested)),
                ];
                Dispatcher::new(attempts)
            }
            target => Dispatcher::for_target(&target, None),
        }
    }
}
