//! ESC/POS receipt renderer
//!
//! Lays out the canonical receipt on a 48-column (80mm) printer:
//! centered store header, customer/date block, fixed-width item table,
//! totals, centered footer, feed and cut. Column model:
//! description 24 + quantity 4 + unit price 10 + amount 10 = 48.

use sari_printer::{pad, wrap_hard, EscPos};
use shared::{CanonicalReceipt, LineItem};

/// 80mm paper at standard font
pub const PAPER_WIDTH: usize = 48;

pub const DESC_WIDTH: usize = 24;
pub const QTY_WIDTH: usize = 4;
pub const PRICE_WIDTH: usize = 10;
pub const AMOUNT_WIDTH: usize = 10;

/// Totals labels are right-aligned against this width, leaving the
/// numeric column flush with the item table's amount column.
pub const TOTAL_LABEL_WIDTH: usize = 38;

const FEED_LINES: u8 = 4;

pub struct ReceiptRenderer<'a> {
    receipt: &'a CanonicalReceipt,
    currency: &'a str,
}

impl<'a> ReceiptRenderer<'a> {
    pub fn new(receipt: &'a CanonicalReceipt, currency: &'a str) -> Self {
        Self { receipt, currency }
    }

    /// Produce the full ESC/POS byte stream for this receipt
    ///
    /// `logo` is a prebuilt GS v 0 block (empty means no logo).
    /// The stream always starts with printer initialization and ends
    /// with feed-then-cut.
    pub fn render(&self, logo: Option<&[u8]>, kick_drawer: bool) -> Vec<u8> {
        let mut p = EscPos::new(PAPER_WIDTH);
        p.codepage(0);

        if let Some(logo) = logo.filter(|l| !l.is_empty()) {
            p.center().raw(logo).newline();
        }

        // Store header
        p.center().bold().double_width();
        p.line(&self.receipt.store.name);
        p.reset_size().bold_off();
        p.line(&self.receipt.store.address1);
        if let Some(address2) = &self.receipt.store.address2 {
            p.line(address2);
        }
        p.newline();

        // Customer/date block
        p.left();
        p.line(&format!("Customer: {}", self.receipt.customer.name));
        p.line(&format!("Points: {}", self.receipt.customer.points));
        p.line(&format!(
            "Date: {}",
            self.receipt.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
        p.sep_double();

        // Item table
        p.line(&header_row());
        p.sep_single();
        for item in &self.receipt.items {
            for line in self.item_lines(item) {
                p.line(&line);
            }
        }
        p.sep_single();

        // Totals
        p.line(&self.total_line("Total:", self.receipt.cart_total));
        p.line(&self.total_line("Amount:", self.receipt.amount_tendered));
        p.bold();
        p.line(&self.total_line("Change:", self.receipt.change));
        p.bold_off();

        // Footer
        p.center();
        p.newline();
        p.line("Thank you for shopping!");
        p.line("Please come again");
        p.left();

        if kick_drawer {
            p.open_drawer();
        }

        p.feed(FEED_LINES);
        p.cut();
        p.build()
    }

    /// Table lines for one item
    ///
    /// Descriptions longer than the column hard-wrap at 24 characters;
    /// continuation lines repeat only the description column.
    fn item_lines(&self, item: &LineItem) -> Vec<String> {
        let mut chunks = wrap_hard(&item.description, DESC_WIDTH).into_iter();
        let first = chunks.next().unwrap_or_default();

        let mut lines = vec![format!(
            "{}{}{}{}",
            pad(&first, DESC_WIDTH, false),
            pad(&format_qty(item.quantity), QTY_WIDTH, true),
            pad(&self.money(item.unit_price), PRICE_WIDTH, true),
            pad(&self.money(item.amount), AMOUNT_WIDTH, true),
        )];
        lines.extend(chunks.map(|chunk| pad(&chunk, DESC_WIDTH, false)));
        lines
    }

    fn total_line(&self, label: &str, value: f64) -> String {
        format!(
            "{}{}",
            pad(label, TOTAL_LABEL_WIDTH, true),
            pad(&self.money(value), AMOUNT_WIDTH, true)
        )
    }

    fn money(&self, value: f64) -> String {
        format!("{}{:.2}", self.currency, value)
    }
}

fn header_row() -> String {
    format!(
        "{}{}{}{}",
        pad("Description", DESC_WIDTH, false),
        pad("Qty", QTY_WIDTH, true),
        pad("Price", PRICE_WIDTH, true),
        pad("Amount", AMOUNT_WIDTH, true),
    )
}

/// Whole quantities print without a decimal tail
fn format_qty(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{}", q as i64)
    } else {
        format!("{q}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use shared::{CustomerInfo, StoreInfo};

    fn receipt(items: Vec<LineItem>, cart_total: f64, tendered: f64) -> CanonicalReceipt {
        CanonicalReceipt {
            store: StoreInfo {
                name: "SARI-SARI STORE".to_string(),
                address1: "14 Mabini St".to_string(),
                address2: None,
            },
            customer: CustomerInfo {
                name: "Juan".to_string(),
                points: 12.0,
            },
            items,
            cart_total,
            amount_tendered: tendered,
            change: tendered - cart_total,
            timestamp: Local::now(),
        }
    }

    fn item(description: &str, quantity: f64, unit_price: f64) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity,
            unit_price,
            amount: quantity * unit_price,
        }
    }

    fn render(receipt: &CanonicalReceipt) -> Vec<u8> {
        ReceiptRenderer::new(receipt, "P").render(None, false)
    }

    #[test]
    fn test_frame_init_and_cut() {
        let data = render(&receipt(vec![item("Rice 1kg", 1.0, 55.0)], 55.0, 100.0));
        assert_eq!(&data[..2], &[0x1B, 0x40]);
        assert_eq!(&data[2..5], &[0x1B, 0x74, 0x00]);
        let tail = &data[data.len() - 6..];
        assert_eq!(tail, &[0x1B, 0x64, FEED_LINES, 0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_long_description_wraps() {
        let long = "Super Premium Jasmine Rice Export Quality";
        let data = render(&receipt(vec![item(long, 2.0, 60.0)], 120.0, 200.0));
        let text = String::from_utf8_lossy(&data).to_string();

        // First line carries exactly 24 description characters plus the
        // numeric columns; the remainder lands on its own line.
        let first = &long[..24];
        let rest = &long[24..];
        let item_line = text
            .lines()
            .find(|l| l.starts_with(first))
            .expect("item line missing");
        assert!(item_line.contains("P60.00"));
        assert!(item_line.contains("P120.00"));
        assert!(text.lines().any(|l| l.starts_with(rest) && !l.contains('P')));
    }

    #[test]
    fn test_short_description_is_padded() {
        let data = render(&receipt(vec![item("Egg", 3.0, 8.0)], 24.0, 24.0));
        let text = String::from_utf8_lossy(&data).to_string();
        let line = text.lines().find(|l| l.starts_with("Egg")).unwrap();
        // Description column is exactly 24 wide, then a 4-wide quantity
        assert_eq!(&line[..DESC_WIDTH], &format!("{:<24}", "Egg"));
        assert_eq!(&line[DESC_WIDTH..DESC_WIDTH + QTY_WIDTH], "   3");
        assert_eq!(line.chars().count(), PAPER_WIDTH);
    }

    #[test]
    fn test_totals_right_aligned() {
        let items = vec![
            item("Rice 1kg", 1.0, 55.0),
            item("Cooking Oil 1L", 1.0, 85.0),
            item("Sugar 500g", 1.0, 10.0),
        ];
        let data = render(&receipt(items, 150.0, 200.0));
        let text = String::from_utf8_lossy(&data).to_string();

        let total = format!("{:>38}{:>10}", "Total:", "P150.00");
        let amount = format!("{:>38}{:>10}", "Amount:", "P200.00");
        let change = format!("{:>38}{:>10}", "Change:", "P50.00");
        assert!(text.contains(&total));
        assert!(text.contains(&amount));
        assert!(text.contains(&change));
    }

    #[test]
    fn test_logo_block_inserted_after_codepage() {
        let logo = vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0xFF];
        let r = receipt(vec![item("Rice 1kg", 1.0, 55.0)], 55.0, 100.0);
        let data = ReceiptRenderer::new(&r, "P").render(Some(&logo), false);

        let pos = data
            .windows(logo.len())
            .position(|w| w == logo.as_slice())
            .expect("logo block missing");
        assert!(pos >= 5);
    }

    #[test]
    fn test_empty_logo_is_omitted() {
        let r = receipt(vec![item("Rice 1kg", 1.0, 55.0)], 55.0, 100.0);
        let with_empty = ReceiptRenderer::new(&r, "P").render(Some(&[]), false);
        let without = ReceiptRenderer::new(&r, "P").render(None, false);
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_drawer_kick_precedes_cut() {
        let r = receipt(vec![item("Rice 1kg", 1.0, 55.0)], 55.0, 100.0);
        let data = ReceiptRenderer::new(&r, "P").render(None, true);

        let kick = [0x1B, 0x70, 0x00, 25, 250];
        let pos = data
            .windows(kick.len())
            .position(|w| w == kick)
            .expect("drawer kick missing");
        // Still ends with feed + cut
        assert!(pos < data.len() - 6);
        assert_eq!(&data[data.len() - 6..], &[0x1B, 0x64, FEED_LINES, 0x1D, 0x56, 0x00]);
    }
}
