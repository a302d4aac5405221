//! Bakery Settlement Core
//!
//! The transaction settlement engine of a bakery/retail ERP: for every
//! Sale, Sale Return, Purchase, Purchase Return and Order it persists line
//! items, mutates multi-location stock ledgers (raw materials via recipe
//! explosion), posts balanced double-entry accounting, and keeps
//! Order↔Sale links in sync, all under financial-period locking and with
//! idempotent supersede semantics for edits and recoveries.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod services;

pub use config::SettlementConfig;
pub use db::DbPool;
pub use errors::ServiceError;
pub use services::factory::{build_services, SettlementServices};
pub use services::settlement::{
    CartTotals, LineInput, TenderSplit, TransactionInput, WriteMode,
};
