use std::collections::{BTreeMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;

use salesanalytics_analytics::{build_filter_predicate, DateRange};
use salesanalytics_core::{CustomerId, Entity, ProductId, RegionId, SaleId};
use salesanalytics_sales::{Customer, Product, Region, Sale, SaleRecord};

use super::{RecordCounts, SalesRepository, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    customers: BTreeMap<CustomerId, Customer>,
    regions: BTreeMap<RegionId, Region>,
    sales: Vec<Sale>,
    sale_ids: HashSet<SaleId>,
}

impl Tables {
    fn join(&self, sale: &Sale) -> StoreResult<SaleRecord> {
        let product = self
            .products
            .get(&sale.product_id)
            .ok_or_else(|| dangling("product", sale.id, sale.product_id))?;
        let customer = self
            .customers
            .get(&sale.customer_id)
            .ok_or_else(|| dangling("customer", sale.id, sale.customer_id))?;
        let region = self
            .regions
            .get(&sale.region_id)
            .ok_or_else(|| dangling("region", sale.id, sale.region_id))?;
        Ok(SaleRecord::join(sale, product, customer, region))
    }
}

fn dangling(table: &str, sale: SaleId, id: impl std::fmt::Display) -> StoreError {
    StoreError::Integrity(format!("sale {sale} references missing {table} {id}"))
}

fn already_exists<E: Entity>(row: &E) -> StoreError {
    StoreError::Integrity(format!("{} {} already exists", E::KIND, row.id()))
}

/// Insert a reference row whose id and natural key must both be unused.
fn insert_unique<E, F>(
    rows: &mut BTreeMap<E::Id, E>,
    row: E,
    key_name: &str,
    natural_key: F,
) -> StoreResult<()>
where
    E: Entity,
    F: Fn(&E) -> &str,
{
    if rows.contains_key(&row.id()) {
        return Err(already_exists(&row));
    }
    let key = natural_key(&row);
    if rows.values().any(|existing| natural_key(existing) == key) {
        return Err(StoreError::Integrity(format!("{key_name} '{key}' already exists")));
    }
    rows.insert(row.id(), row);
    Ok(())
}

/// In-memory sales store.
///
/// Intended for tests/dev. Enforces the same constraints as the SQL schema:
/// unique ids and codes, existing foreign keys, and delete-restricted
/// reference rows.
#[derive(Debug, Default)]
pub struct InMemorySalesStore {
    tables: RwLock<Tables>,
}

impl InMemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    pub fn insert_product(&self, product: Product) -> StoreResult<()> {
        let mut tables = self.write()?;
        insert_unique(&mut tables.products, product, "stock code", |p| &p.stock_code)
    }

    pub fn insert_customer(&self, customer: Customer) -> StoreResult<()> {
        let mut tables = self.write()?;
        insert_unique(&mut tables.customers, customer, "customer code", |c| &c.customer_code)
    }

    pub fn insert_region(&self, region: Region) -> StoreResult<()> {
        let mut tables = self.write()?;
        insert_unique(&mut tables.regions, region, "country", |r| &r.country)
    }

    /// Append a sale. Its product, customer and region must already exist.
    pub fn insert_sale(&self, sale: Sale) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.sale_ids.contains(&sale.id()) {
            return Err(already_exists(&sale));
        }
        // Validates every foreign key.
        tables.join(&sale)?;
        tables.sale_ids.insert(sale.id());
        tables.sales.push(sale);
        Ok(())
    }

    /// Remove a product that no sale references. Returns `None` if absent.
    pub fn remove_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let mut tables = self.write()?;
        if tables.sales.iter().any(|s| s.product_id == id) {
            return Err(StoreError::Integrity(format!("product {id} is referenced by sales")));
        }
        Ok(tables.products.remove(&id))
    }

    pub fn remove_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let mut tables = self.write()?;
        if tables.sales.iter().any(|s| s.customer_id == id) {
            return Err(StoreError::Integrity(format!("customer {id} is referenced by sales")));
        }
        Ok(tables.customers.remove(&id))
    }

    pub fn remove_region(&self, id: RegionId) -> StoreResult<Option<Region>> {
        let mut tables = self.write()?;
        if tables.sales.iter().any(|s| s.region_id == id) {
            return Err(StoreError::Integrity(format!("region {id} is referenced by sales")));
        }
        Ok(tables.regions.remove(&id))
    }
}

#[async_trait::async_trait]
impl SalesRepository for InMemorySalesStore {
    async fn load_sales(&self, range: &DateRange) -> StoreResult<Vec<SaleRecord>> {
        let tables = self.read()?;
        let keep = build_filter_predicate(range);
        let mut records = Vec::new();
        for sale in &tables.sales {
            let record = tables.join(sale)?;
            if keep(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn latest_invoice_date(&self) -> StoreResult<Option<NaiveDateTime>> {
        Ok(self.read()?.sales.iter().map(|s| s.invoice_date).max())
    }

    async fn recent_sales(&self, limit: usize) -> StoreResult<Vec<SaleRecord>> {
        let tables = self.read()?;
        let mut newest: Vec<&Sale> = tables.sales.iter().collect();
        newest.sort_by(|a, b| b.invoice_date.cmp(&a.invoice_date));
        newest.into_iter().take(limit).map(|s| tables.join(s)).collect()
    }

    async fn record_counts(&self) -> StoreResult<RecordCounts> {
        let tables = self.read()?;
        Ok(RecordCounts {
            sales: tables.sales.len() as u64,
            products: tables.products.len() as u64,
            customers: tables.customers.len() as u64,
            regions: tables.regions.len() as u64,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
