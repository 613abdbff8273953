//! Transport strategies for sending encoded print data
//!
//! One implementation per destination kind; the dispatcher walks an
//! ordered list of these and stops at the first success.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{TransportError, TransportResult};

/// Raw printing port most thermal printers listen on
pub const DEFAULT_PORT: u16 = 9100;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

// The protocol has no application-level acknowledgment; the socket is
// held open after the write so the device can drain its buffer.
const DEFAULT_SETTLE: Duration = Duration::from_millis(500);

/// Outcome of a successful dispatch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    /// Transport that accepted the job: "network", "local-raw" or "local-queue"
    pub method: String,
    /// Destination the job went to
    pub printer_name: String,
}

/// Trait for transport strategies
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stable identifier reported back to the caller
    fn method(&self) -> &'static str;

    /// Send raw ESC/POS data to this destination
    async fn send(&self, data: &[u8]) -> TransportResult<DispatchReport>;
}

/// Network printer transport (raw TCP, port 9100)
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    host: String,
    port: u16,
    timeout: Duration,
    settle: Duration,
}

impl NetworkTransport {
    /// Create a transport for `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            settle: DEFAULT_SETTLE,
        }
    }

    /// Set connection/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the post-write settle delay
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if the printer accepts connections (500ms probe)
    #[instrument(fields(target = %self.target()))]
    pub async fn is_online(&self) -> bool {
        let probe = Duration::from_millis(500);
        match tokio::time::timeout(probe, TcpStream::connect((self.host.as_str(), self.port)))
            .await
        {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "printer offline");
                false
            }
            Err(_) => {
                warn!("printer probe timeout");
                false
            }
        }
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    fn method(&self) -> &'static str {
        "network"
    }

    #[instrument(skip(self, data), fields(target = %self.target(), data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> TransportResult<DispatchReport> {
        let target = self.target();
        info!("connecting to network printer");

        let mut stream = tokio::time::timeout(
            self.timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(format!("Connection timeout: {target}")))?
        .map_err(|e| TransportError::Connection(format!("{target}: {e}")))?;

        stream.write_all(data).await?;
        stream.flush().await?;

        tokio::time::sleep(self.settle).await;

        info!(bytes = data.len(), "print job sent");
        Ok(DispatchReport {
            method: self.method().to_string(),
            printer_name: target,
        })
    }
}

/// Write a uniquely-named spool file under the system temp dir
///
/// Name carries a timestamp plus a random suffix so concurrent print
/// requests never collide.
pub(crate) async fn write_spool(data: &[u8]) -> TransportResult<PathBuf> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let path = std::env::temp_dir().join(format!("receipt-{millis}-{}.bin", Uuid::new_v4()));
    tokio::fs::write(&path, data).await?;
    Ok(path)
}

/// Best-effort spool cleanup; failures are logged, never escalated
pub(crate) async fn remove_spool(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "spool cleanup failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_send_writes_all_bytes() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let transport = NetworkTransport::new("127.0.0.1", port)
            .with_settle(Duration::from_millis(10));
        let payload = vec![0x1B, 0x40, b'h', b'i', 0x1D, 0x56, 0x00];
        let report = transport.send(&payload).await.unwrap();

        assert_eq!(report.method, "network");
        assert_eq!(server.await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        // Bind then drop to get a port with no listener
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = NetworkTransport::new("127.0.0.1", port);
        let err = transport.send(&[0x1B, 0x40]).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_spool_names_are_unique() {
        let a = write_spool(b"one").await.unwrap();
        let b = write_spool(b"two").await.unwrap();
        assert_ne!(a, b);
        remove_spool(&a).await;
        remove_spool(&b).await;
        assert!(!a.exists());
        assert!(!b.exists());
    }
}
