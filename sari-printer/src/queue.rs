//! Print queue transport (lp/lpr)
//!
//! Submits a spool file to the system print queue, targeting a named
//! queue when supplied or the default queue otherwise. `lpr` is the
//! fallback for hosts that ship it without `lp`.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, instrument, warn};

use crate::error::{TransportError, TransportResult};
use crate::transport::{remove_spool, write_spool, DispatchReport, Transport};

/// OS print queue transport
#[derive(Debug, Clone)]
pub struct QueueTransport {
    printer: Option<String>,
}

impl QueueTransport {
    /// Target a named queue, or the default queue when `None`
    pub fn new(printer: Option<String>) -> Self {
        Self { printer }
    }

    async fn submit(&self, spool: &Path) -> TransportResult<DispatchReport> {
        match self.run_spooler("lp", "-d", spool).await {
            Ok(report) => Ok(report),
            Err(e) if e.is_unavailable() => {
                warn!(error = %e, "lp unavailable, trying lpr");
                self.run_spooler("lpr", "-P", spool).await
            }
            Err(e) => Err(e),
        }
    }

    async fn run_spooler(
        &self,
        bin: &str,
        name_flag: &str,
        spool: &Path,
    ) -> TransportResult<DispatchReport> {
        let mut cmd = Command::new(bin);
        if let Some(name) = &self.printer {
            cmd.arg(name_flag).arg(name);
        }
        cmd.arg(spool);

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TransportError::Unavailable(bin.to_string())
            } else {
                TransportError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransportError::Spooler(format!(
                "{bin} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!(bin = bin, printer = ?self.printer, "job queued");
        Ok(DispatchReport {
            method: "local-queue".to_string(),
            printer_name: self
                .printer
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        })
    }
}

#[async_trait]
impl Transport for QueueTransport {
    fn method(&self) -> &'static str {
        "local-queue"
    }

    #[instrument(skip(self, data), fields(printer = ?self.printer, data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> TransportResult<DispatchReport> {
        let spool = write_spool(data).await?;
        let result = self.submit(&spool).await;
        // Spool files are transient regardless of outcome
        remove_spool(&spool).await;
        result
    }
}
