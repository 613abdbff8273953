//! Thermal printing API handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use sari_printer::PrinterInfo;

use crate::core::AppState;
use crate::printing::PrintService;
use crate::utils::ApiResult;

/// Response for a completed print request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintReceiptResponse {
    pub success: bool,
    /// Transport that accepted the job
    pub method: String,
    /// Destination the job went to
    pub printer: String,
    pub item_count: usize,
}

/// POST /print/receipt - encode and dispatch a receipt
pub async fn print_receipt(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<PrintReceiptResponse>> {
    let service = PrintService::new(state.config.clone());
    let outcome = service.print_receipt(&payload).await?;

    Ok(Json(PrintReceiptResponse {
        success: true,
        method: outcome.report.method,
        printer: outcome.report.printer_name,
        item_count: outcome.item_count,
    }))
}

/// Response for printer discovery
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPrintersResponse {
    pub success: bool,
    pub printers: Vec<PrinterInfo>,
    pub default_printer: String,
}

/// GET /print/printers - enumerate installed printers
///
/// Always 200: enumeration failure degrades to the placeholder record
/// inside the discovery service, never to an error response.
pub async fn list_printers() -> Json<ListPrintersResponse> {
    let printers = sari_printer::list_printers().await;
    let default_printer = printers
        .iter()
        .find(|p| p.is_default)
        .or_else(|| printers.first())
        .map(|p| p.name.clone())
        .unwrap_or_else(|| sari_printer::PLACEHOLDER_PRINTER.to_string());

    Json(ListPrintersResponse {
        success: true,
        printers,
        default_printer,
    })
}
