//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 7070 | HTTP listen port |
//! | STORE_NAME | SARI-SARI STORE | Receipt header line 1 |
//! | STORE_ADDRESS1 | (empty) | Receipt header line 2 |
//! | STORE_ADDRESS2 | unset | Receipt header line 3 |
//! | CURRENCY_SYMBOL | P | Prefix for numeric columns |
//! | LOGO_PATH | logo.png | Logo bitmap for the receipt top |
//! | LOGO_WIDTH | 384 | Logo target width in dots |
//! | PRINTER_HOST | unset | Network printer host (enables network path) |
//! | PRINTER_PORT | 9100 | Network printer port |
//! | PRINTER_NAME | unset | Local printer/queue name (OS default otherwise) |
//! | PRINTER_TIMEOUT_MS | 5000 | Socket connect/write timeout |
//! | PRINTER_SETTLE_MS | 500 | Post-write settle delay |
//! | KICK_DRAWER | false | Pulse the cash drawer after printing |
//! | CHROME_PATH | unset | Explicit headless browser binary |
//! | LOG_DIR | unset | Directory for daily-rolling log files |

use std::path::PathBuf;

use sari_printer::{PrintTarget, DEFAULT_PORT};
use shared::StoreInfo;

/// Print server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,

    // === Receipt content ===
    pub store_name: String,
    pub store_address1: String,
    pub store_address2: Option<String>,
    pub currency_symbol: String,
    pub logo_path: String,
    pub logo_width: u32,

    // === Thermal printing ===
    /// Network printer host; when set, the network path is attempted first
    pub printer_host: Option<String>,
    pub printer_port: u16,
    /// Local printer/queue name; OS default when unset
    pub printer_name: Option<String>,
    pub printer_timeout_ms: u64,
    pub printer_settle_ms: u64,
    pub kick_drawer: bool,

    // === Document rendering ===
    pub chrome_path: Option<PathBuf>,

    // === Logging ===
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT", 7070),
            store_name: std::env::var("STORE_NAME")
                .unwrap_or_else(|_| "SARI-SARI STORE".into()),
            store_address1: std::env::var("STORE_ADDRESS1").unwrap_or_default(),
            store_address2: std::env::var("STORE_ADDRESS2").ok().filter(|s| !s.is_empty()),
            currency_symbol: std::env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "P".into()),
            logo_path: std::env::var("LOGO_PATH").unwrap_or_else(|_| "logo.png".into()),
            logo_width: env_parse("LOGO_WIDTH", 384),
            printer_host: std::env::var("PRINTER_HOST").ok().filter(|s| !s.is_empty()),
            printer_port: env_parse("PRINTER_PORT", DEFAULT_PORT),
            printer_name: std::env::var("PRINTER_NAME").ok().filter(|s| !s.is_empty()),
            printer_timeout_ms: env_parse("PRINTER_TIMEOUT_MS", 5000),
            printer_settle_ms: env_parse("PRINTER_SETTLE_MS", 500),
            kick_drawer: env_parse("KICK_DRAWER", false),
            chrome_path: std::env::var("CHROME_PATH").ok().map(PathBuf::from),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Store identity for receipt headers
    pub fn store_info(&self) -> StoreInfo {
        StoreInfo {
            name: self.store_name.clone(),
            address1: self.store_address1.clone(),
            address2: self.store_address2.clone(),
        }
    }

    /// Destination for a print request
    ///
    /// A configured network host wins; otherwise the platform's local
    /// path, aimed at the requested printer, the configured one, or the
    /// OS default.
    pub fn print_target(&self, requested_printer: Option<&str>) -> PrintTarget {
        if let Some(host) = &self.printer_host {
            return PrintTarget::Network {
                host: host.clone(),
                port: self.printer_port,
            };
        }

        let printer = requested_printer
            .map(str::to_string)
            .or_else(|| self.printer_name.clone());

        if cfg!(windows) {
            PrintTarget::LocalRaw { printer }
        } else {
            PrintTarget::Queue { printer }
        }
    }

    /// Local fallback printer for a request (request override first)
    pub fn fallback_printer(&self, requested_printer: Option<&str>) -> Option<String> {
        requested_printer
            .map(str::to_string)
            .or_else(|| self.printer_name.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_target_wins() {
        let mut config = Config::from_env();
        config.printer_host = Some("192.168.1.50".to_string());
        config.printer_port = 9100;

        match config.print_target(Some("Receipt_Front")) {
            PrintTarget::Network { host, port } => {
                assert_eq!(host, "192.168.1.50");
                assert_eq!(port, 9100);
            }
            other => panic!("expected network target, got {other:?}"),
        }
    }

    #[test]
    fn test_local_target_prefers_requested_printer() {
        let mut config = Config::from_env();
        config.printer_host = None;
        config.printer_name = Some("Configured".to_string());

        let target = config.print_target(Some("Requested"));
        let printer = match target {
            PrintTarget::LocalRaw { printer } | PrintTarget::Queue { printer } => printer,
            other => panic!("expected local target, got {other:?}"),
        };
        assert_eq!(printer.as_deref(), Some("Requested"));
    }

    #[test]
    fn test_fallback_printer_order() {
        let mut config = Config::from_env();
        config.printer_name = Some("Configured".to_string());

        assert_eq!(
            config.fallback_printer(Some("Requested")).as_deref(),
            Some("Requested")
        );
        assert_eq!(
            config.fallback_printer(None).as_deref(),
            Some("Configured")
        );
    }
}
