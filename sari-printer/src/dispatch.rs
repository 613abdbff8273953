//! Ordered-fallback dispatch
//!
//! A print request carries one [`PrintTarget`]; the dispatcher expands
//! it into an ordered list of transport attempts (network first when
//! configured, then the platform's local path) and short-circuits on
//! the first success. The list is plain data so a future transport can
//! be inserted without touching the dispatch loop.

use tracing::{info, instrument, warn};

use crate::error::{TransportError, TransportResult};
use crate::transport::{DispatchReport, NetworkTransport, Transport};

/// Where a print job should go
#[derive(Debug, Clone)]
pub enum PrintTarget {
    /// Raw socket to a network printer
    Network { host: String, port: u16 },
    /// OS raw spooler path (named printer, or the OS default)
    LocalRaw { printer: Option<String> },
    /// POSIX print queue (named queue, or the default queue)
    Queue { printer: Option<String> },
}

/// Build the platform's local transport
///
/// Capability detection happens here, once, instead of platform checks
/// scattered through dispatch logic.
pub fn local_transport(printer: Option<String>) -> Box<dyn Transport> {
    #[cfg(windows)]
    return Box::new(crate::winraw::LocalRawTransport::new(printer));

    #[cfg(not(windows))]
    Box::new(crate::queue::QueueTransport::new(printer))
}

/// Walks an ordered transport list, stopping at the first success
pub struct Dispatcher {
    attempts: Vec<Box<dyn Transport>>,
}

impl Dispatcher {
    /// Dispatch over an explicit, caller-configured attempt list
    pub fn new(attempts: Vec<Box<dyn Transport>>) -> Self {
        Self { attempts }
    }

    /// Standard attempt plan for a target
    ///
    /// A network target gets the local path appended as fallback, aimed
    /// at `fallback_printer` (or the OS default) — the caller does not
    /// need to retry.
    pub fn for_target(target: &PrintTarget, fallback_printer: Option<&str>) -> Self {
        let attempts: Vec<Box<dyn Transport>> = match target {
            PrintTarget::Network { host, port } => vec![
                Box::new(NetworkTransport::new(host.clone(), *port)),
                local_transport(fallback_printer.map(str::to_string)),
            ],
            PrintTarget::LocalRaw { printer } | PrintTarget::Queue { printer } => {
                vec![local_transport(printer.clone())]
            }
        };
        Self::new(attempts)
    }

    /// Send `data` through the attempt list
    ///
    /// Returns the first successful report, or a terminal
    /// [`TransportError::Exhausted`] naming the last failing hop. There
    /// is no retry queue; a failure here is final for this request.
    #[instrument(skip(self, data), fields(attempts = self.attempts.len(), data_len = data.len()))]
    pub async fn dispatch(&self, data: &[u8]) -> TransportResult<DispatchReport> {
        let mut last: Option<(&'static str, TransportError)> = None;

        for transport in &self.attempts {
            match transport.send(data).await {
                Ok(report) => {
                    info!(
                        method = %report.method,
                        printer = %report.printer_name,
                        "dispatch succeeded"
                    );
                    return Ok(report);
                }
                Err(e) => {
                    warn!(
                        transport = transport.method(),
                        error = %e,
                        "transport attempt failed, falling back"
                    );
                    last = Some((transport.method(), e));
                }
            }
        }

        Err(match last {
            Some((method, err)) => {
                TransportError::Exhausted(format!("last attempt via {method}: {err}"))
            }
            None => TransportError::Exhausted("no transports configured".to_string()),
        })
    }
}
