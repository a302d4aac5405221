//! Services of the settlement core.
//!
//! Leaf services (period guard, numbering, recipes, stock, accounting,
//! order links) are stateless over a borrowed connection so the saga can
//! drive them inside one database transaction; the settlement module holds
//! the per-family orchestrators.

pub mod accounting;
pub mod factory;
pub mod financial_period;
pub mod numbering;
pub mod order_links;
pub mod orders;
pub mod recipes;
pub mod settlement;
pub mod stock;

pub use accounting::AccountingService;
pub use financial_period::FinancialPeriodService;
pub use numbering::TransactionNumberService;
pub use order_links::OrderLinkService;
pub use orders::OrderService;
pub use recipes::RecipeService;
pub use settlement::purchase_returns::PurchaseReturnService;
pub use settlement::purchases::PurchaseService;
pub use settlement::sale_returns::SaleReturnService;
pub use settlement::sales::SaleService;
pub use settlement::SettlementCore;
pub use stock::StockLedgerService;
