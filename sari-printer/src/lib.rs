//! # sari-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Fixed-width column layout helpers
//! - Logo rasterization (GS v 0 raster graphics)
//! - Network printing (TCP port 9100) with ordered local fallback
//! - OS raw/spooler printing (winspool on Windows, lp/lpr elsewhere)
//! - Printer discovery (enumeration, default lookup, connection probe)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Receipt rendering → pos-server
//!
//! ## Example
//!
//! ```ignore
//! use sari_printer::{Dispatcher, EscPos, PrintTarget};
//!
//! // Build ESC/POS content
//! let mut p = EscPos::new(48);
//! p.codepage(0);
//! p.center();
//! p.line("SARI-SARI STORE");
//! p.left();
//! p.feed(4);
//! p.cut();
//!
//! // Send to the configured destination, falling back network -> local
//! let target = PrintTarget::Network { host: "192.168.1.50".into(), port: 9100 };
//! let report = Dispatcher::for_target(&target, None).dispatch(&p.build()).await?;
//! println!("printed via {}", report.method);
//! ```

mod columns;
mod discovery;
mod dispatch;
mod error;
mod escpos;
mod queue;
mod transport;

#[cfg(feature = "image")]
mod raster;

#[cfg(windows)]
mod winraw;

// Re-exports
pub use columns::{pad, truncate, wrap_hard};
pub use discovery::{
    default_printer_name, list_printers, test_printer_connection, PrinterInfo,
    PLACEHOLDER_PRINTER,
};
pub use dispatch::{local_transport, Dispatcher, PrintTarget};
pub use error::{DiscoveryError, TransportError, TransportResult};
pub use escpos::EscPos;
pub use queue::QueueTransport;
pub use transport::{DispatchReport, NetworkTransport, Transport, DEFAULT_PORT};

#[cfg(feature = "image")]
pub use raster::{rasterize, RasterImage, MAX_LOGO_WIDTH, MIN_LOGO_WIDTH};

#[cfg(windows)]
pub use winraw::LocalRawTransport;
