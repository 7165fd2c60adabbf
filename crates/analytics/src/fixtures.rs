//! Record builders shared by the engine's unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use salesanalytics_core::{CustomerId, ProductId, RegionId, SaleId};
use salesanalytics_sales::SaleRecord;

pub fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Customer ids are derived from the numeric part of the code so that equal
/// codes share an id.
pub fn record_at(customer_code: &str, amount: &str, at: NaiveDateTime) -> SaleRecord {
    SaleBuilder::new(customer_code, amount, at).build()
}

pub struct SaleBuilder {
    record: SaleRecord,
}

impl SaleBuilder {
    pub fn new(customer_code: &str, amount: &str, at: NaiveDateTime) -> Self {
        let customer_id = customer_code
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .unwrap_or(0);
        Self {
            record: SaleRecord {
                sale_id: SaleId::new(0),
                invoice_no: "INV-0".into(),
                product_id: ProductId::new(1),
                customer_id: CustomerId::new(customer_id),
                region_id: RegionId::new(1),
                stock_code: "P1".into(),
                description: Some("Widget".into()),
                customer_code: customer_code.into(),
                country: "United Kingdom".into(),
                quantity: 1,
                unit_price: dec(amount),
                total_amount: dec(amount),
                invoice_date: at,
            },
        }
    }

    pub fn sale_id(mut self, id: i32) -> Self {
        self.record.sale_id = SaleId::new(id);
        self.record.invoice_no = format!("INV-{id}");
        self
    }

    pub fn product(mut self, id: i32, stock_code: &str, description: Option<&str>) -> Self {
        self.record.product_id = ProductId::new(id);
        self.record.stock_code = stock_code.into();
        self.record.description = description.map(Into::into);
        self
    }

    pub fn country(mut self, id: i32, country: &str) -> Self {
        self.record.region_id = RegionId::new(id);
        self.record.country = country.into();
        self
    }

    pub fn quantity(mut self, quantity: i32) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn build(self) -> SaleRecord {
        self.record
    }
}

/// The three-sale dataset: 2024-01-15 10.00, 2024-02-10 20.00, 2024-02-20 30.00.
pub fn three_sales() -> Vec<SaleRecord> {
    vec![
        SaleBuilder::new("C1", "10.00", ymd_hms(2024, 1, 15, 9, 0, 0)).sale_id(1).build(),
        SaleBuilder::new("C2", "20.00", ymd_hms(2024, 2, 10, 14, 30, 0)).sale_id(2).build(),
        SaleBuilder::new("C1", "30.00", ymd_hms(2024, 2, 20, 16, 45, 0)).sale_id(3).build(),
    ]
}
