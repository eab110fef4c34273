//! CSV export and bulk-import parsing.
//!
//! Export keeps the dashboard's historical format: the header row is the
//! serialized key set of the first product minus internal identifiers, and
//! every value is JSON-stringified, which doubles as quoting for fields that
//! contain delimiters. Absent values become the empty string before
//! stringification.
//!
//! Import is all-or-nothing: the whole file parses and validates before
//! anything is persisted, and the first bad row rejects the upload with its
//! line number.

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::{NewProduct, Product, DEFAULT_REORDER_LEVEL};
use crate::error::ApiError;

/// Internal identifiers excluded from the export header.
const EXCLUDED_FIELDS: &[&str] = &["id"];

pub fn export(products: &[Product]) -> Result<String, ApiError> {
    let mut rows = Vec::with_capacity(products.len());
    for product in products {
        if let Value::Object(map) = serde_json::to_value(product)? {
            rows.push(map);
        }
    }
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };

    let headers: Vec<String> = first
        .keys()
        .filter(|key| !EXCLUDED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    let mut lines = vec![headers.join(",")];
    for row in &rows {
        let mut fields = Vec::with_capacity(headers.len());
        for key in &headers {
            let value = match row.get(key) {
                None | Some(Value::Null) => Value::String(String::new()),
                Some(value) => value.clone(),
            };
            fields.push(serde_json::to_string(&value)?);
        }
        lines.push(fields.join(","));
    }
    Ok(lines.join("\n"))
}

/// One CSV data row. Headers are accepted in camelCase or snake_case; empty
/// fields read as absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    name: String,
    sku: String,
    category: String,
    price: f64,
    quantity: i32,
    #[serde(default, alias = "reorder_level")]
    reorder_level: Option<i32>,
    #[serde(default, alias = "expiry_date")]
    expiry_date: Option<NaiveDate>,
    #[serde(default)]
    supplier: Option<String>,
    #[serde(default)]
    barcode: Option<String>,
    #[serde(default, alias = "image_url")]
    image_url: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl CsvRow {
    fn into_new_product(self) -> Result<NewProduct, String> {
        let price = Decimal::try_from(self.price).map_err(|e| format!("invalid price: {e}"))?;
        Ok(NewProduct {
            name: self.name,
            sku: self.sku,
            category: self.category,
            price,
            quantity: self.quantity,
            reorder_level: self.reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL),
            expiry_date: self.expiry_date,
            supplier: self.supplier,
            barcode: self.barcode,
            image_url: self.image_url,
            description: self.description,
        })
    }
}

pub fn parse(data: &[u8]) -> Result<Vec<NewProduct>, ApiError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(data);
    let mut products = Vec::new();
    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2; // line 1 is the header
        let row = record.map_err(|e| ApiError::CsvRejected {
            line,
            reason: e.to_string(),
        })?;
        let product = row
            .into_new_product()
            .map_err(|reason| ApiError::CsvRejected { line, reason })?;
        product.validate().map_err(|e| ApiError::CsvRejected {
            line,
            reason: e.to_string(),
        })?;
        products.push(product);
    }
    if products.is_empty() {
        return Err(ApiError::Validation("CSV contained no data rows".into()));
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn product(name: &str, price: Decimal, expiry_date: Option<NaiveDate>) -> Product {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            sku: format!("SKU-{name}"),
            category: "General".into(),
            price,
            quantity: 3,
            reorder_level: 5,
            expiry_date,
            supplier: None,
            barcode: None,
            image_url: None,
            description: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn export_header_and_stringified_rows() {
        let products = vec![
            product("A", Decimal::new(15, 1), None),
            product("B", Decimal::new(2, 0), None),
        ];
        let text = export(&products).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 3);

        let headers: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(headers[0], "name");
        assert!(!headers.contains(&"id"));

        let price_col = headers.iter().position(|h| *h == "price").unwrap();
        let row_a: Vec<&str> = lines[1].split(',').collect();
        let row_b: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(row_a[0], "\"A\"");
        assert_eq!(row_a[price_col], "1.5");
        assert_eq!(row_b[0], "\"B\"");
        assert_eq!(row_b[price_col], "2");
    }

    #[test]
    fn export_stringifies_absent_values_as_empty() {
        let products = vec![product("A", Decimal::ONE, None)];
        let text = export(&products).unwrap();
        let headers: Vec<&str> = text.split('\n').next().unwrap().split(',').collect();
        let expiry_col = headers.iter().position(|h| *h == "expiryDate").unwrap();
        let row: Vec<&str> = text.split('\n').nth(1).unwrap().split(',').collect();
        assert_eq!(row[expiry_col], "\"\"");
    }

    #[test]
    fn export_of_nothing_is_empty() {
        assert_eq!(export(&[]).unwrap(), "");
    }

    #[test]
    fn parse_applies_defaults() {
        let data = b"name,sku,category,price,quantity\nMilk,MLK-1,Dairy,2.5,4\n";
        let products = parse(data).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Milk");
        assert_eq!(products[0].reorder_level, DEFAULT_REORDER_LEVEL);
        assert!(products[0].expiry_date.is_none());
    }

    #[test]
    fn parse_accepts_camel_case_headers() {
        let data =
            b"name,sku,category,price,quantity,reorderLevel,expiryDate\nMilk,MLK-1,Dairy,2.5,4,10,2025-06-03\n";
        let products = parse(data).unwrap();
        assert_eq!(products[0].reorder_level, 10);
        assert_eq!(
            products[0].expiry_date,
            NaiveDate::from_ymd_opt(2025, 6, 3)
        );
    }

    #[test]
    fn parse_accepts_snake_case_headers() {
        let data = b"name,sku,category,price,quantity,reorder_level\nMilk,MLK-1,Dairy,2.5,4,10\n";
        assert_eq!(parse(data).unwrap()[0].reorder_level, 10);
    }

    #[test]
    fn malformed_row_rejects_whole_file_with_line_number() {
        let data = b"name,sku,category,price,quantity\nMilk,MLK-1,Dairy,2.5,4\nBread,BRD-1,Bakery,oops,2\n";
        let err = parse(data).unwrap_err();
        match err {
            ApiError::CsvRejected { line, .. } => assert_eq!(line, 3),
            other => panic!("expected CsvRejected, got {other:?}"),
        }
    }

    #[test]
    fn invalid_row_values_reject_whole_file() {
        let data = b"name,sku,category,price,quantity\nMilk,MLK-1,Dairy,2.5,-4\n";
        assert!(matches!(
            parse(data).unwrap_err(),
            ApiError::CsvRejected { line: 2, .. }
        ));
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            parse(b"name,sku,category,price,quantity\n").unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
