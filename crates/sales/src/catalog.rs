//! Reference data: products, customers and regions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use salesanalytics_core::{CustomerId, Entity, ProductId, RegionId};

/// A stock item. `stock_code` is unique across products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub stock_code: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A customer. `customer_code` is unique across customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub customer_code: String,
    pub created_at: NaiveDateTime,
}

/// A sales region, one per country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    pub country: String,
    pub created_at: NaiveDateTime,
}

impl Entity for Product {
    const KIND: &'static str = "product";
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Entity for Customer {
    const KIND: &'static str = "customer";
    type Id = CustomerId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Entity for Region {
    const KIND: &'static str = "region";
    type Id = RegionId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
