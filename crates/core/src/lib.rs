//! `salesanalytics-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use id::{CustomerId, ProductId, RegionId, SaleId};
pub use money::{percent_change, percent_of, ratio, round_money, MONEY_SCALE};
pub use value_object::ValueObject;
