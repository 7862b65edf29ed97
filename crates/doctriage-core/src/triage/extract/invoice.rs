use regex::Regex;

use crate::category::Category;

use super::{
    first_match, first_match_with_digit, insert_text, ExtractedFields, FieldExtractor,
    FieldValue, LineItem,
};

/// How many leading lines are searched for a vendor heading. Invoices put
/// the issuing company above the fold.
const VENDOR_SCAN_LINES: usize = 5;

const CORPORATE_MARKERS: &[&str] = &[
    "corporation",
    "incorporated",
    "inc",
    "corp",
    "ltd",
    "llc",
    "solutions",
    "technologies",
];

pub struct InvoiceExtractor {
    vendor_label: Regex,
    bill_to: Regex,
    customer_label: Regex,
    heading_label: Regex,
    invoice_number: Regex,
    po_number: Regex,
    invoice_date_labeled: Regex,
    invoice_date_generic: Regex,
    due_date: Regex,
    total: Regex,
    subtotal: Regex,
    tax_amount: Regex,
    tax_rate: Regex,
    payment_terms: Regex,
    item_header: Regex,
    item_row_start: Regex,
    item_row: Regex,
    table_end: Regex,
}

impl InvoiceExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        const DATE: &str =
            r"\d{1,2}\s*[/-]\s*\d{1,2}\s*[/-]\s*\d{2,4}|\d{4}-\d{2}-\d{2}|[A-Za-z]{3,9}\s+\d{1,2},?\s+\d{4}";
        const AMOUNT: &str = r"[$€£]?\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?";

        Ok(Self {
            vendor_label: Regex::new(r"(?im)^\s*vendor\s*[:\-]\s*(.+)$")?,
            bill_to: Regex::new(r"(?im)^\s*(?:bill\s+to|invoice\s+to|sold\s+to)\s*[:\-]\s*(.+)$")?,
            customer_label: Regex::new(r"(?im)^\s*(?:customer|client)\s*[:\-]\s*(.+)$")?,
            heading_label: Regex::new(
                r"(?i)^(?:bill\s+to|invoice\s+to|sold\s+to|customer|client|vendor)\s*[:\-]\s*",
            )?,
            invoice_number: Regex::new(
                r"(?i)\b(?:invoice|inv\.?)\s*(?:number|no\.?|#)?\s*[:\-]?\s*#?\s*([A-Za-z0-9][A-Za-z0-9/-]*)",
            )?,
            po_number: Regex::new(
                r"(?i)\b(?:p\.?o\.?|purchase\s+order)\s*(?:number|no\.?|#)?\s*[:\-]?\s*([A-Za-z0-9][A-Za-z0-9/-]*)",
            )?,
            invoice_date_labeled: Regex::new(&format!(
                r"(?i)\binvoice\s+date\s*[:\-]\s*({DATE})"
            ))?,
            invoice_date_generic: Regex::new(&format!(r"(?i)\b(?:date|issued)\s*[:\-]\s*({DATE})"))?,
            due_date: Regex::new(r"(?i)\b(?:due\s+date|payment\s+due)\s*[:\-]\s*([^\n]+)")?,
            total: Regex::new(&format!(
                r"(?i)\b(?:grand\s+total|total|amount\s+due|balance\s+due|final\s+amount)\s*[:\-]\s*({AMOUNT})"
            ))?,
            subtotal: Regex::new(&format!(r"(?i)\bsub\s*-?\s*total\s*[:\-]\s*({AMOUNT})"))?,
            tax_amount: Regex::new(
                r"(?i)\b(?:sales\s+tax|tax|vat|gst)\s*(?:\([^)]*\))?\s*[:\-]\s*([$€£]\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?|\d{1,3}(?:,\d{3})*\.\d{2})",
            )?,
            tax_rate: Regex::new(
                r"(?i)\b(?:sales\s+tax|tax|vat|gst)\s*\(?\s*[:\-]?\s*(\d+(?:\.\d+)?%)",
            )?,
            payment_terms: Regex::new(
                r"(?i)\b(?:net\s+\d+|within\s+\d+\s+days|payment\s+due\s+in\s+\d+\s+days)",
            )?,
            item_header: Regex::new(r"(?i)description.*price.*(?:qty|quantity).*(?:total|amount)")?,
            item_row_start: Regex::new(r"^\s*\d+\s+[A-Za-z]")?,
            item_row: Regex::new(
                r"^(\d+)\s+(.+?)\s+\$?(\d+(?:\.\d+)?)\s+(\d+)\s+\$?(\d+(?:\.\d+)?)$",
            )?,
            table_end: Regex::new(r"(?i)\b(?:sub\s*-?\s*total|total|thank\s+you|terms|payment)\b")?,
        })
    }

    /// Vendor resolution: explicit label, then a corporate-sounding line
    /// near the top, then the billing block heading.
    fn vendor_name(&self, text: &str) -> Option<String> {
        if let Some(value) = first_match(&self.vendor_label, text) {
            return Some(value);
        }

        for line in text.lines().filter(|l| !l.trim().is_empty()).take(VENDOR_SCAN_LINES) {
            let lowered = line.to_lowercase();
            if CORPORATE_MARKERS
                .iter()
                .any(|marker| lowered.split(|c: char| !c.is_ascii_alphanumeric()).any(|w| w == *marker))
            {
                let stripped = self.heading_label.replace(line.trim(), "");
                return Some(stripped.trim().to_string());
            }
        }

        first_match(&self.bill_to, text)
    }

    fn invoice_date(&self, text: &str) -> Option<String> {
        first_match(&self.invoice_date_labeled, text)
            .or_else(|| first_match(&self.invoice_date_generic, text))
            .map(|value| value.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn line_items(&self, text: &str) -> Vec<LineItem> {
        let lines: Vec<&str> = text.lines().collect();

        let start = lines
            .iter()
            .position(|line| self.item_header.is_match(line))
            .map(|header| header + 1)
            .or_else(|| lines.iter().position(|line| self.item_row.is_match(line.trim())))
            .or_else(|| lines.iter().position(|line| self.item_row_start.is_match(line)));

        let Some(start) = start else {
            return Vec::new();
        };

        let mut items = Vec::new();
        for line in &lines[start..] {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.table_end.is_match(line) {
                break;
            }
            if let Some(cap) = self.item_row.captures(line) {
                items.push(LineItem {
                    description: cap[2].trim().to_string(),
                    unit_price: cap[3].to_string(),
                    quantity: cap[4].to_string(),
                    amount: cap[5].to_string(),
                });
            }
        }
        items
    }
}

fn currency(text: &str) -> Option<&'static str> {
    if text.contains('$') {
        Some("USD")
    } else if text.contains('€') {
        Some("EUR")
    } else if text.contains('£') {
        Some("GBP")
    } else if text.contains('¥') {
        Some("JPY")
    } else {
        None
    }
}

impl FieldExtractor for InvoiceExtractor {
    fn category(&self) -> Category {
        Category::Invoice
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "vendor_name",
            "customer_name",
            "invoice_number",
            "po_number",
            "invoice_date",
            "due_date",
            "subtotal",
            "tax_amount",
            "tax_rate",
            "total_amount",
            "payment_terms",
            "currency",
            "line_items",
        ]
    }

    fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::new();

        insert_text(&mut fields, "vendor_name", self.vendor_name(text));
        insert_text(
            &mut fields,
            "customer_name",
            first_match(&self.bill_to, text).or_else(|| first_match(&self.customer_label, text)),
        );
        insert_text(
            &mut fields,
            "invoice_number",
            first_match_with_digit(&self.invoice_number, text),
        );
        insert_text(
            &mut fields,
            "po_number",
            first_match_with_digit(&self.po_number, text),
        );
        insert_text(&mut fields, "invoice_date", self.invoice_date(text));
        insert_text(&mut fields, "due_date", first_match(&self.due_date, text));
        insert_text(&mut fields, "subtotal", first_match(&self.subtotal, text));
        insert_text(&mut fields, "tax_amount", first_match(&self.tax_amount, text));
        insert_text(&mut fields, "tax_rate", first_match(&self.tax_rate, text));
        insert_text(&mut fields, "total_amount", first_match(&self.total, text));
        insert_text(
            &mut fields,
            "payment_terms",
            first_match(&self.payment_terms, text),
        );
        insert_text(&mut fields, "currency", currency(text).map(String::from));

        let items = self.line_items(text);
        if !items.is_empty() {
            fields.insert("line_items".to_string(), FieldValue::Items(items));
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> InvoiceExtractor {
        InvoiceExtractor::new().unwrap()
    }

    fn text_field<'a>(fields: &'a ExtractedFields, name: &str) -> Option<&'a str> {
        match fields.get(name) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_minimal_invoice() {
        let fields = extractor().extract("INVOICE #INV-1001\nBill To: Acme Corp\nTotal: $450.00");

        assert_eq!(text_field(&fields, "invoice_number"), Some("INV-1001"));
        assert!(text_field(&fields, "vendor_name").unwrap().contains("Acme Corp"));
        assert_eq!(text_field(&fields, "customer_name"), Some("Acme Corp"));
        assert_eq!(text_field(&fields, "total_amount"), Some("$450.00"));
        assert_eq!(text_field(&fields, "currency"), Some("USD"));
    }

    #[test]
    fn test_full_invoice() {
        let text = "TechNova Solutions\n\
                    123 Harbor Street\n\
                    Invoice Number: 2024-118\n\
                    Invoice Date: 01/15/2024\n\
                    Due Date: 02/14/2024\n\
                    PO Number: PO-5521\n\
                    Bill To: Orbit Labs\n\
                    \n\
                    Item Description    Price   Qty   Total\n\
                    1 Web development 450.00 2 900.00\n\
                    2 Hosting 25.00 12 300.00\n\
                    Subtotal: $1,200.00\n\
                    Tax (8.5%): $102.00\n\
                    Total: $1,302.00\n\
                    Payment terms: Net 30";

        let fields = extractor().extract(text);

        assert_eq!(text_field(&fields, "vendor_name"), Some("TechNova Solutions"));
        assert_eq!(text_field(&fields, "customer_name"), Some("Orbit Labs"));
        assert_eq!(text_field(&fields, "invoice_number"), Some("2024-118"));
        assert_eq!(text_field(&fields, "po_number"), Some("PO-5521"));
        assert_eq!(text_field(&fields, "invoice_date"), Some("01/15/2024"));
        assert_eq!(text_field(&fields, "due_date"), Some("02/14/2024"));
        assert_eq!(text_field(&fields, "subtotal"), Some("$1,200.00"));
        assert_eq!(text_field(&fields, "tax_amount"), Some("$102.00"));
        assert_eq!(text_field(&fields, "tax_rate"), Some("8.5%"));
        assert_eq!(text_field(&fields, "total_amount"), Some("$1,302.00"));
        assert_eq!(text_field(&fields, "payment_terms"), Some("Net 30"));

        match fields.get("line_items") {
            Some(FieldValue::Items(items)) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].description, "Web development");
                assert_eq!(items[0].unit_price, "450.00");
                assert_eq!(items[0].quantity, "2");
                assert_eq!(items[0].amount, "900.00");
            }
            other => panic!("expected line items, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_yields_no_fields() {
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_invoice_number_requires_digits() {
        let fields = extractor().extract("This invoice covers consulting services.");
        assert!(fields.get("invoice_number").is_none());
    }
}
