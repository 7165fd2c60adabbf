use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salesanalytics_core::{CustomerId, Entity, ProductId, RegionId, SaleId};

use crate::catalog::{Customer, Product, Region};

/// Description reported for products stored without one.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// One invoice line.
///
/// `total_amount` is expected to equal `quantity * unit_price`; ingestion is
/// responsible for that, the reporting layer never recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub invoice_no: String,
    pub product_id: ProductId,
    pub customer_id: CustomerId,
    pub region_id: RegionId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub invoice_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl Entity for Sale {
    const KIND: &'static str = "sale";
    type Id = SaleId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A sale joined to its product, customer and region.
///
/// This is the projected row every aggregation reads: the foreign keys are
/// kept for distinct counts, the joined attributes for grouping and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub sale_id: SaleId,
    pub invoice_no: String,
    pub product_id: ProductId,
    pub customer_id: CustomerId,
    pub region_id: RegionId,
    pub stock_code: String,
    pub description: Option<String>,
    pub customer_code: String,
    pub country: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub invoice_date: NaiveDateTime,
}

impl SaleRecord {
    /// Join a sale with its reference rows.
    ///
    /// The caller is responsible for passing the rows the sale's foreign keys
    /// point at.
    pub fn join(sale: &Sale, product: &Product, customer: &Customer, region: &Region) -> Self {
        debug_assert_eq!(sale.product_id, product.id);
        debug_assert_eq!(sale.customer_id, customer.id);
        debug_assert_eq!(sale.region_id, region.id);

        Self {
            sale_id: sale.id,
            invoice_no: sale.invoice_no.clone(),
            product_id: sale.product_id,
            customer_id: sale.customer_id,
            region_id: sale.region_id,
            stock_code: product.stock_code.clone(),
            description: product.description.clone(),
            customer_code: customer.customer_code.clone(),
            country: region.country.clone(),
            quantity: sale.quantity,
            unit_price: sale.unit_price,
            total_amount: sale.total_amount,
            invoice_date: sale.invoice_date,
        }
    }

    /// Product description, falling back to [`UNKNOWN_DESCRIPTION`].
    pub fn description_or_unknown(&self) -> &str {
        self.description.as_deref().unwrap_or(UNKNOWN_DESCRIPTION)
    }
}
