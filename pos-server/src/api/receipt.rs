//! PDF receipt API handler

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use shared::ReceiptBuilder;

use crate::core::AppState;
use crate::utils::ApiResult;

/// POST /receipt - render a receipt as a content-sized 80mm PDF
///
/// Responds with the raw PDF bytes; `Content-Disposition` carries an
/// epoch-millis filename so repeated downloads never collide.
pub async fn receipt_pdf(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<Response> {
    let receipt = ReceiptBuilder::build(&payload, state.config.store_info())?;

    let pdf = state
        .browser
        .render_receipt(&receipt, &state.config.currency_symbol)
        .await?;

    info!(bytes = pdf.len(), items = receipt.items.len(), "receipt PDF rendered");

    let filename = format!("receipt-{}.pdf", Utc::now().timestamp_millis());
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        ),
        (header::CONTENT_LENGTH, pdf.len().to_string()),
    ];

    Ok((headers, pdf).into_response())
}
