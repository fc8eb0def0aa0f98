//! Receipt field formatting

use crate::models::ReceiptFields;

/// Format extracted fields, one per line; missing fields show as "-"
pub fn format_receipt_fields(
    fields: &ReceiptFields,
    suggested_category: Option<&str>,
    confidence: Option<f64>,
) -> String {
    let currency = fields.currency_or_default();
    let dash = || "-".to_string();

    let mut output = String::new();
    output.push_str(&format!(
        "Merchant:  {}\n",
        fields.merchant.clone().unwrap_or_else(dash)
    ));
    output.push_str(&format!(
        "Total:     {}\n",
        fields
            .total
            .map(|t| t.format_with_symbol(currency.symbol()))
            .unwrap_or_else(dash)
    ));
    output.push_str(&format!("Currency:  {}\n", currency));
    output.push_str(&format!(
        "Date:      {}\n",
        fields.date.map(|d| d.to_string()).unwrap_or_else(dash)
    ));
    if let Some(category) = suggested_category {
        output.push_str(&format!("Category:  {} (suggested)\n", category));
    }
    if let Some(confidence) = confidence {
        output.push_str(&format!("OCR confidence: {:.0}%\n", confidence * 100.0));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, Money};

    #[test]
    fn test_format_fields() {
        let fields = ReceiptFields {
            merchant: Some("Corner Deli".to_string()),
            total: Some(Money::from_cents(999)),
            currency: Some(Currency::Gbp),
            date: None,
        };

        let output = format_receipt_fields(&fields, Some("Dining"), Some(0.873));
        assert!(output.contains("Merchant:  Corner Deli"));
        assert!(output.contains("Total:     £9.99"));
        assert!(output.contains("Date:      -"));
        assert!(output.contains("Dining (suggested)"));
        assert!(output.contains("OCR confidence: 87%"));
    }
}
