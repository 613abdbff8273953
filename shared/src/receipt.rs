//! Canonical receipt model and builder
//!
//! Normalizes an inbound sale transaction (arbitrary JSON from the POS
//! frontend) into a canonical, printer-agnostic structure. Both output
//! paths consume this model; neither sees the raw payload.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Hard cap on line items per receipt; longer payloads are truncated
/// to bound downstream rendering cost.
pub const MAX_RECEIPT_ITEMS: usize = 2000;

/// Store identity printed in the receipt header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
}

/// Customer block (name + loyalty points)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub points: f64,
}

/// A single sale line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

/// Printer-agnostic receipt, built fresh per print request and
/// discarded after dispatch/render completes.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalReceipt {
    pub store: StoreInfo,
    pub customer: CustomerInfo,
    pub items: Vec<LineItem>,
    pub cart_total: f64,
    pub amount_tendered: f64,
    pub change: f64,
    pub timestamp: DateTime<Local>,
}

/// Builds a [`CanonicalReceipt`] from a raw transaction payload
pub struct ReceiptBuilder;

impl ReceiptBuilder {
    /// Normalize a raw payload into the canonical model.
    ///
    /// Numeric fields accept JSON numbers and numeric strings; anything
    /// else coerces to 0. `items` must be a non-empty array.
    pub fn build(payload: &Value, store: StoreInfo) -> Result<CanonicalReceipt, ValidationError> {
        let raw_items = payload.get("items").ok_or(ValidationError::MissingItems)?;
        let raw_items = raw_items.as_array().ok_or(ValidationError::InvalidItems)?;
        if raw_items.is_empty() {
            return Err(ValidationError::EmptyItems);
        }

        let items = raw_items
            .iter()
            .take(MAX_RECEIPT_ITEMS)
            .map(build_line_item)
            .collect();

        let customer = payload
            .get("customer")
            .map(|c| CustomerInfo {
                name: string_field(c, "name").unwrap_or_else(|| "Walk-in Customer".to_string()),
                points: coerce_number(c.get("points")),
            })
            .unwrap_or_else(|| CustomerInfo {
                name: "Walk-in Customer".to_string(),
                points: 0.0,
            });

        Ok(CanonicalReceipt {
            store,
            customer,
            items,
            cart_total: coerce_number(payload.get("cartTotal")),
            amount_tendered: coerce_number(payload.get("amount")),
            change: coerce_number(payload.get("change")),
            timestamp: Local::now(),
        })
    }
}

fn build_line_item(raw: &Value) -> LineItem {
    let description = string_field(raw, "description")
        .or_else(|| string_field(raw, "name"))
        .unwrap_or_else(|| "Item".to_string());

    let quantity = coerce_number(raw.get("quantity")).max(0.0);
    let raw_amount = coerce_number(raw.get("amount"));

    // Unit price falls back to amount/quantity when the field is absent
    let unit_price = match raw.get("unitPrice").or_else(|| raw.get("price")) {
        Some(v) => coerce_number(Some(v)),
        None if quantity > 0.0 => raw_amount / quantity,
        None => 0.0,
    };

    LineItem {
        description,
        quantity,
        unit_price,
        amount: round2(quantity * unit_price),
    }
}

/// Coerce a JSON value to f64: numbers pass through, numeric strings
/// are parsed, everything else (including absence) becomes 0.
fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> StoreInfo {
        StoreInfo {
            name: "TEST STORE".to_string(),
            address1: "123 Test St".to_string(),
            address2: None,
        }
    }

    #[test]
    fn test_missing_items_rejected() {
        let err = ReceiptBuilder::build(&json!({}), store()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingItems));
    }

    #[test]
    fn test_non_array_items_rejected() {
        let err = ReceiptBuilder::build(&json!({"items": "nope"}), store()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidItems));
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = ReceiptBuilder::build(&json!({"items": []}), store()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyItems));
    }

    #[test]
    fn test_numeric_string_coercion() {
        let payload = json!({
            "items": [{"description": "Rice 1kg", "quantity": "2", "unitPrice": "55.50"}],
            "cartTotal": "111.00",
            "amount": 200,
            "change": "89.00"
        });

        let receipt = ReceiptBuilder::build(&payload, store()).unwrap();
        let item = &receipt.items[0];
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.unit_price, 55.5);
        assert_eq!(item.amount, 111.0);
        assert_eq!(receipt.cart_total, 111.0);
        assert_eq!(receipt.amount_tendered, 200.0);
        assert_eq!(receipt.change, 89.0);
    }

    #[test]
    fn test_unit_price_derived_from_amount() {
        let payload = json!({
            "items": [{"name": "Soap", "quantity": 4, "amount": 100.0}]
        });

        let receipt = ReceiptBuilder::build(&payload, store()).unwrap();
        let item = &receipt.items[0];
        assert_eq!(item.unit_price, 25.0);
        assert_eq!(item.amount, 100.0);
    }

    #[test]
    fn test_garbage_numbers_default_to_zero() {
        let payload = json!({
            "items": [{"description": "Candy", "quantity": {"not": "a number"}, "unitPrice": null}]
        });

        let receipt = ReceiptBuilder::build(&payload, store()).unwrap();
        let item = &receipt.items[0];
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.unit_price, 0.0);
        assert_eq!(item.amount, 0.0);
    }

    #[test]
    fn test_item_cap_truncates() {
        let items: Vec<Value> = (0..3000)
            .map(|i| json!({"description": format!("Item {i}"), "quantity": 1, "unitPrice": 1.0}))
            .collect();
        let payload = json!({ "items": items });

        let receipt = ReceiptBuilder::build(&payload, store()).unwrap();
        assert_eq!(receipt.items.len(), MAX_RECEIPT_ITEMS);
    }

    #[test]
    fn test_anonymous_customer_default() {
        let payload = json!({"items": [{"description": "Bread", "quantity": 1, "unitPrice": 10}]});

        let receipt = ReceiptBuilder::build(&payload, store()).unwrap();
        assert_eq!(receipt.customer.name, "Walk-in Customer");
        assert_eq!(receipt.customer.points, 0.0);
    }

    #[test]
    fn test_amount_rounded_to_cents() {
        let payload = json!({
            "items": [{"description": "Thread", "quantity": 3, "unitPrice": 0.333}]
        });

        let receipt = ReceiptBuilder::build(&payload, store()).unwrap();
        assert_eq!(receipt.items[0].amount, 1.0);
    }
}
