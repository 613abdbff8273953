//! Windows raw printing (winspool)
//!
//! Sends preformatted ESC/POS bytes straight through the spooler with
//! the RAW datatype, bypassing driver-level page rendering. Also hosts
//! the Win32 enumeration primitives the discovery service builds on.

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::error::{TransportError, TransportResult};
use crate::transport::{remove_spool, write_spool, DispatchReport, Transport};

/// Raw spooler transport for a named printer (or the OS default)
#[derive(Debug, Clone)]
pub struct LocalRawTransport {
    printer: Option<String>,
}

impl LocalRawTransport {
    /// Target a named printer, or the OS default when `None`
    pub fn new(printer: Option<String>) -> Self {
        Self { printer }
    }
}

#[async_trait]
impl Transport for LocalRawTransport {
    fn method(&self) -> &'static str {
        "local-raw"
    }

    #[instrument(skip(self, data), fields(printer = ?self.printer, data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> TransportResult<DispatchReport> {
        let spool = write_spool(data).await?;

        let name = self.printer.clone();
        let bytes = data.to_vec();
        // winspool calls are synchronous; keep them off the runtime
        let result = tokio::task::spawn_blocking(move || {
            let resolved = resolve(name.as_deref())?;
            write_raw(&resolved, &bytes)?;
            Ok::<String, TransportError>(resolved)
        })
        .await;

        remove_spool(&spool).await;

        let resolved = result
            .map_err(|e| TransportError::WindowsPrinter(format!("Task join failed: {e}")))??;
        info!(printer = %resolved, "raw job written");
        Ok(DispatchReport {
            method: self.method().to_string(),
            printer_name: resolved,
        })
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// List installed printers, filtering out virtual queues
pub(crate) fn list_printer_names() -> TransportResult<Vec<String>> {
    use windows::Win32::Graphics::Printing::{
        EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
    };
    use windows::core::PWSTR;

    unsafe {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);

        if needed == 0 {
            return Ok(Vec::new());
        }

        let mut buf: Vec<u8> = vec![0; needed as usize];
        EnumPrintersW(
            flags,
            None,
            5,
            Some(buf.as_mut_slice()),
            &mut needed,
            &mut returned,
        )
        .map_err(|_| TransportError::WindowsPrinter("EnumPrintersW failed".to_string()))?;

        let ptr = buf.as_ptr() as *const PRINTER_INFO_5W;
        let slice = std::slice::from_raw_parts(ptr, returned as usize);

        let mut result: Vec<String> = Vec::new();
        for info in slice.iter() {
            if info.pPrinterName.is_null() {
                continue;
            }
            let name = PWSTR(info.pPrinterName.0).to_string().unwrap_or_default();

            let port = if info.pPortName.is_null() {
                String::new()
            } else {
                PWSTR(info.pPortName.0).to_string().unwrap_or_default()
            };

            if !is_virtual_port(&port) {
                result.push(name);
            }
        }

        Ok(result)
    }
}

/// Virtual queues (XPS, OneNote, file ports) can't take raw ESC/POS
fn is_virtual_port(port: &str) -> bool {
    let p = port.to_lowercase();
    p == "file:"
        || p == "portprompt:"
        || p == "xpsport:"
        || p.starts_with("onenote")
        || p == "nul:"
        || p.starts_with("wfsport:")
}

/// Get the default printer name, if one is configured
pub(crate) fn default_printer() -> TransportResult<Option<String>> {
    use windows::Win32::Graphics::Printing::GetDefaultPrinterW;
    use windows::core::PWSTR;

    unsafe {
        let mut needed: u32 = 0;
        let _ = GetDefaultPrinterW(None, &mut needed);

        if needed == 0 {
            return Ok(None);
        }

        let mut buf: Vec<u16> = vec![0; needed as usize];
        let ok = GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed);

        if !ok.as_bool() {
            return Ok(None);
        }

        let name = PWSTR(buf.as_mut_ptr())
            .to_string()
            .map_err(|e| TransportError::WindowsPrinter(format!("UTF-16 decode failed: {e}")))?;

        Ok(Some(name))
    }
}

/// Resolve a printer name: verify it exists, or fall back to the
/// default printer, or the first installed one.
pub(crate) fn resolve(name: Option<&str>) -> TransportResult<String> {
    if let Some(name) = name {
        let printers = list_printer_names()?;
        if printers.iter().any(|p| p == name) {
            return Ok(name.to_string());
        }
        return Err(TransportError::WindowsPrinter(format!(
            "Printer not found: {name}"
        )));
    }

    if let Some(default) = default_printer()? {
        return Ok(default);
    }

    let printers = list_printer_names()?;
    printers
        .first()
        .cloned()
        .ok_or_else(|| TransportError::WindowsPrinter("No printers available".to_string()))
}

/// Heuristic online check (spooler status + TCP probe for IP ports)
pub(crate) fn check_online(name: &str) -> TransportResult<bool> {
    use std::net::{TcpStream, ToSocketAddrs};
    use std::time::Duration;
    use windows::Win32::Graphics::Printing::{
        ClosePrinter, GetPrinterW, OpenPrinterW, PRINTER_HANDLE, PRINTER_INFO_5W, PRINTER_INFO_6,
        PRINTER_STATUS_OFFLINE,
    };
    use windows::core::{PCWSTR, PWSTR};

    unsafe {
        let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
        let name_w = to_wide(name);

        OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
            .map_err(|_| TransportError::WindowsPrinter("OpenPrinterW failed".to_string()))?;

        let mut needed6: u32 = 0;
        let _ = GetPrinterW(handle, 6, None, &mut needed6);

        if needed6 > 0 {
            let mut buf6: Vec<u8> = vec![0; needed6 as usize];
            if GetPrinterW(handle, 6, Some(buf6.as_mut_slice()), &mut needed6).is_ok() {
                let info6 = *(buf6.as_ptr() as *const PRINTER_INFO_6);
                if (info6.dwStatus & PRINTER_STATUS_OFFLINE) != 0 {
                    let _ = ClosePrinter(handle);
                    return Ok(false);
                }
            }
        }

        let mut needed5: u32 = 0;
        let _ = GetPrinterW(handle, 5, None, &mut needed5);

        let port = if needed5 > 0 {
            let mut buf5: Vec<u8> = vec![0; needed5 as usize];
            if GetPrinterW(handle, 5, Some(buf5.as_mut_slice()), &mut needed5).is_ok() {
                let info5 = *(buf5.as_ptr() as *const PRINTER_INFO_5W);
                if !info5.pPortName.is_null() {
                    PWSTR(info5.pPortName.0).to_string().unwrap_or_default()
                } else {
                    String::new()
                }
            } else {
                String::new()
            }
        } else {
            String::new()
        };

        let _ = ClosePrinter(handle);

        // IP_xxx ports map to network printers; probe them directly
        let lower = port.to_lowercase();
        if lower.starts_with("ip_") {
            let host = lower.trim_start_matches("ip_");
            let host = host.split(',').next().unwrap_or(host);

            let timeout = Duration::from_millis(400);
            if let Ok(mut iter) = format!("{host}:9100").to_socket_addrs()
                && let Some(addr) = iter.next()
            {
                return Ok(TcpStream::connect_timeout(&addr, timeout).is_ok());
            }
            return Ok(false);
        }

        // Non-IP printers count as online unless marked offline
        Ok(true)
    }
}

/// Push bytes through the spooler with the RAW datatype
fn write_raw(name: &str, data: &[u8]) -> TransportResult<()> {
    use core::ffi::c_void;
    use windows::Win32::Graphics::Printing::{
        ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
        StartDocPrinterW, StartPagePrinter, WritePrinter,
    };
    use windows::core::{PCWSTR, PWSTR};

    unsafe {
        if !check_online(name).unwrap_or(true) {
            return Err(TransportError::Offline(name.to_string()));
        }

        let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
        let name_w = to_wide(name);

        OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
            .map_err(|_| TransportError::WindowsPrinter("OpenPrinterW failed".to_string()))?;

        let doc_name_w = to_wide("Receipt");
        let datatype_w = to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
            let _ = ClosePrinter(handle);
            return Err(TransportError::WindowsPrinter(
                "StartDocPrinter failed".to_string(),
            ));
        }

        if !StartPagePrinter(handle).as_bool() {
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);
            return Err(TransportError::WindowsPrinter(
                "StartPagePrinter failed".to_string(),
            ));
        }

        let mut written: u32 = 0;
        let ok = WritePrinter(
            handle,
            data.as_ptr() as *const c_void,
            data.len() as u32,
            &mut written,
        );

        let _ = EndPagePrinter(handle);
        let _ = EndDocPrinter(handle);
        let _ = ClosePrinter(handle);

        if !ok.as_bool() {
            return Err(TransportError::WindowsPrinter(
                "WritePrinter failed".to_string(),
            ));
        }

        if written != data.len() as u32 {
            warn!(expected = data.len(), written, "short write to spooler");
            return Err(TransportError::WindowsPrinter(
                "Incomplete write".to_string(),
            ));
        }

        Ok(())
    }
}
