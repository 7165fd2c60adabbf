//! Sales domain model.
//!
//! This crate contains the reference rows (products, customers, regions), the
//! sale fact row and the joined projection the reporting engine reads. It is
//! pure data: no IO, no HTTP, no storage.

pub mod catalog;
pub mod sale;

pub use catalog::{Customer, Product, Region};
pub use sale::{Sale, SaleRecord, UNKNOWN_DESCRIPTION};
