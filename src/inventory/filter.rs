//! Pure in-memory filtering over an already-fetched product list.
//!
//! This is the instant-filter path: deterministic, re-entrant, callable on
//! every keystroke. All four predicates are ANDed.

use chrono::{Days, NaiveDate};

use crate::domain::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockStatus {
    #[default]
    Any,
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryFilter {
    #[default]
    Any,
    /// Expiry date at or before the end of the look-ahead window. Deliberately
    /// no lower bound: already-expired products also match, since they need
    /// attention at least as much as soon-to-expire ones.
    ExpiringSoon,
}

#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against the product name.
    pub search: String,
    pub status: StockStatus,
    pub expiry: ExpiryFilter,
    /// Exact case-insensitive category match when non-empty.
    pub category: String,
}

impl FilterCriteria {
    pub fn matches(&self, product: &Product, today: NaiveDate, window_days: u64) -> bool {
        let matches_search = self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());

        let matches_status = match self.status {
            StockStatus::Any => true,
            StockStatus::In => product.quantity > 0,
            StockStatus::Out => product.quantity == 0,
        };

        let matches_expiry = match self.expiry {
            ExpiryFilter::Any => true,
            ExpiryFilter::ExpiringSoon => {
                let until = today
                    .checked_add_days(Days::new(window_days))
                    .unwrap_or(NaiveDate::MAX);
                product.expiry_date.is_some_and(|date| date <= until)
            }
        };

        let matches_category =
            self.category.is_empty() || product.category.eq_ignore_ascii_case(&self.category);

        matches_search && matches_status && matches_expiry && matches_category
    }
}

/// Apply the criteria, preserving input order.
pub fn apply(
    products: &[Product],
    criteria: &FilterCriteria,
    today: NaiveDate,
    window_days: u64,
) -> Vec<Product> {
    products
        .iter()
        .filter(|p| criteria.matches(p, today, window_days))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    const WINDOW: u64 = 7;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn product(
        name: &str,
        category: &str,
        quantity: i32,
        expiry_date: Option<NaiveDate>,
    ) -> Product {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            sku: format!("SKU-{name}"),
            category: category.into(),
            price: Decimal::new(250, 2),
            quantity,
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

    fn fixture() -> Vec<Product> {
        vec![
            product("Milk", "Dairy", 0, NaiveDate::from_ymd_opt(2025, 6, 3)),
            product("Bread", "Bakery", 10, None),
            product("Cheddar", "Dairy", 4, NaiveDate::from_ymd_opt(2025, 7, 20)),
        ]
    }

    #[test]
    fn empty_criteria_is_identity() {
        let products = fixture();
        let filtered = apply(&products, &FilterCriteria::default(), today(), WINDOW);
        assert_eq!(filtered, products);
    }

    #[test]
    fn filtering_is_idempotent() {
        let products = fixture();
        let criteria = FilterCriteria {
            category: "dairy".into(),
            ..Default::default()
        };
        let once = apply(&products, &criteria, today(), WINDOW);
        let twice = apply(&once, &criteria, today(), WINDOW);
        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_stock_filter_keeps_only_zero_quantity() {
        let products = vec![
            product("Milk", "Dairy", 0, None),
            product("Bread", "Bakery", 10, None),
        ];
        let criteria = FilterCriteria {
            status: StockStatus::Out,
            ..Default::default()
        };
        let filtered = apply(&products, &criteria, today(), WINDOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Milk");
    }

    #[test]
    fn stock_filters_partition_the_list() {
        let products = fixture();
        let out = apply(
            &products,
            &FilterCriteria {
                status: StockStatus::Out,
                ..Default::default()
            },
            today(),
            WINDOW,
        );
        let in_stock = apply(
            &products,
            &FilterCriteria {
                status: StockStatus::In,
                ..Default::default()
            },
            today(),
            WINDOW,
        );
        assert_eq!(out.len() + in_stock.len(), products.len());
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let criteria = FilterCriteria {
            search: "milk".into(),
            ..Default::default()
        };
        let filtered = apply(&fixture(), &criteria, today(), WINDOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Milk");
    }

    #[test]
    fn search_does_not_match_category() {
        let criteria = FilterCriteria {
            search: "dairy".into(),
            ..Default::default()
        };
        assert!(apply(&fixture(), &criteria, today(), WINDOW).is_empty());
    }

    #[test]
    fn category_match_is_exact_and_case_insensitive() {
        let criteria = FilterCriteria {
            category: "DAIRY".into(),
            ..Default::default()
        };
        let filtered = apply(&fixture(), &criteria, today(), WINDOW);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn expiring_soon_includes_already_expired() {
        let products = vec![
            product("Yoghurt", "Dairy", 3, NaiveDate::from_ymd_opt(2025, 5, 20)),
            product("Milk", "Dairy", 5, NaiveDate::from_ymd_opt(2025, 6, 5)),
            product("Cheddar", "Dairy", 4, NaiveDate::from_ymd_opt(2025, 7, 20)),
            product("Bread", "Bakery", 10, None),
        ];
        let criteria = FilterCriteria {
            expiry: ExpiryFilter::ExpiringSoon,
            ..Default::default()
        };
        let filtered = apply(&products, &criteria, today(), WINDOW);
        let names: Vec<_> = filtered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Yoghurt", "Milk"]);
    }

    #[test]
    fn predicates_are_anded() {
        let criteria = FilterCriteria {
            search: "c".into(),
            status: StockStatus::In,
            category: "dairy".into(),
            ..Default::default()
        };
        let filtered = apply(&fixture(), &criteria, today(), WINDOW);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Cheddar");
    }
}
