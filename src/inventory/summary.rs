//! Dashboard summary: four inventory counts derived from concurrent queries.

use serde::Serialize;

use super::Inventory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub expiring_soon: usize,
}

/// Issue the four sub-queries concurrently and count the results.
pub async fn summarize(inventory: &Inventory) -> Result<InventorySummary, sqlx::Error> {
    let (all, low, out, expiring) = tokio::try_join!(
        inventory.list_all(),
        inventory.list_low_stock(),
        inventory.list_out_of_stock(),
        inventory.list_expiring_soon(),
    )?;
    Ok(InventorySummary {
        total: all.len(),
        low_stock: low.len(),
        out_of_stock: out.len(),
        expiring_soon: expiring.len(),
    })
}

/// All-or-nothing fallback: if any sub-query fails, every count resets to
/// zero and the failure is logged rather than surfaced partially.
pub async fn summarize_or_empty(inventory: &Inventory) -> InventorySummary {
    match summarize(inventory).await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::warn!(error = %err, "summary queries failed, returning zero counts");
            InventorySummary::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_summary_is_all_zeros() {
        let summary = InventorySummary::default();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.low_stock, 0);
        assert_eq!(summary.out_of_stock, 0);
        assert_eq!(summary.expiring_soon, 0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let summary = InventorySummary {
            total: 3,
            low_stock: 2,
            out_of_stock: 1,
            expiring_soon: 1,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total": 3,
                "lowStock": 2,
                "outOfStock": 1,
                "expiringSoon": 1
            })
        );
    }
}
