//! Receipt markup and page sizing
//!
//! Pure functions: the HTML template the browser lays out, and the
//! measured-pixels → page-height conversion. Both are testable without
//! a browser.

use shared::CanonicalReceipt;

/// Receipt paper width
pub const PAGE_WIDTH_MM: f64 = 80.0;

/// 80mm at 96 dpi
pub const VIEWPORT_PX: u32 = 302;

/// CSS reference pixel density
pub const PX_PER_INCH: f64 = 96.0;

pub const MM_PER_INCH: f64 = 25.4;

// Guard band so descenders on the last line are never clipped
const PADDING_MM: f64 = 2.0;

const MIN_HEIGHT_MM: f64 = 40.0;
const MAX_HEIGHT_MM: f64 = 4000.0;

/// JS snippet measuring the receipt container's height in CSS pixels,
/// vertical margins included.
pub const MEASURE_JS: &str = r#"(() => {
    const el = document.getElementById('receipt');
    if (!el) return 0;
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    return rect.height + parseFloat(style.marginTop) + parseFloat(style.marginBottom);
})()"#;

/// Convert a measured content height to the PDF page height
///
/// px→mm at 25.4/96, plus a small padding, clamped to a sane range
/// whatever the measurement said.
pub fn page_height_mm(content_px: f64) -> f64 {
    let px = if content_px.is_finite() { content_px } else { 0.0 };
    (px * MM_PER_INCH / PX_PER_INCH + PADDING_MM).clamp(MIN_HEIGHT_MM, MAX_HEIGHT_MM)
}

/// Render the canonical receipt as a styled HTML document sized to an
/// 80mm-wide viewport.
pub fn receipt_html(receipt: &CanonicalReceipt, currency: &str) -> String {
    let mut rows = String::new();
    for item in &receipt.items {
        rows.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}{:.2}</td><td class=\"num\">{}{:.2}</td></tr>\n",
            escape(&item.description),
            item.quantity,
            escape(currency),
            item.unit_price,
            escape(currency),
            item.amount,
        ));
    }

    let address2 = receipt
        .store
        .address2
        .as_deref()
        .map(|a| format!("<div class=\"store-address\">{}</div>", escape(a)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ width: {VIEWPORT_PX}px; background: #fff; color: #000;
         font-family: "Courier New", monospace; font-size: 12px; }}
  #receipt {{ padding: 8px; }}
  .store-name {{ text-align: center; font-size: 16px; font-weight: bold; }}
  .store-address {{ text-align: center; }}
  .meta {{ margin-top: 8px; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 8px; }}
  th {{ text-align: left; border-bottom: 1px dashed #000; padding-bottom: 2px; }}
  th.num, td.num {{ text-align: right; }}
  td {{ vertical-align: top; word-break: break-word; }}
  .totals {{ margin-top: 8px; border-top: 1px dashed #000; padding-top: 4px; }}
  .totals div {{ display: flex; justify-content: space-between; }}
  .totals .change {{ font-weight: bold; }}
  .footer {{ text-align: center; margin-top: 12px; }}
</style>
</head>
<body>
<div id="receipt">
  <div class="store-name">{store_name}</div>
  <div class="store-address">{address1}</div>
  {address2}
  <div class="meta">
    <div>Customer: {customer}</div>
    <div>Points: {points}</div>
    <div>Date: {date}</div>
  </div>
  <table>
    <thead>
      <tr><th>Description</th><th class="num">Qty</th>
          <th class="num">Price</th><th class="num">Amount</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
  <div class="totals">
    <div><span>Total</span><span>{cur}{total:.2}</span></div>
    <div><span>Amount</span><span>{cur}{tendered:.2}</span></div>
    <div class="change"><span>Change</span><span>{cur}{change:.2}</span></div>
  </div>
  <div class="footer">Thank you for shopping!<br>Please come again</div>
</div>
</body>
</html>
"#,
        store_name = escape(&receipt.store.name),
        address1 = escape(&receipt.store.address1),
        address2 = address2,
        customer = escape(&receipt.customer.name),
        points = receipt.customer.points,
        date = receipt.timestamp.format("%Y-%m-%d %H:%M:%S"),
        rows = rows,
        cur = escape(currency),
        total = receipt.cart_total,
        tendered = receipt.amount_tendered,
        change = receipt.change,
    )
}

/// Minimal HTML escaping for text nodes and attribute values
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
