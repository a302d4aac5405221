//! Persistent entities for the settlement core.
//!
//! All tables are sea-orm `DeriveEntityModel` modules. Transaction headers
//! for every family (sales, returns, purchases, orders) share the
//! polymorphic `transactions` table discriminated by `TransactionKind`.

pub mod accounting;
pub mod accounting_line;
pub mod financial_year;
pub mod ledger;
pub mod location;
pub mod recipe;
pub mod recipe_line;
pub mod stock_movement;
pub mod transaction;
pub mod transaction_line;

pub use accounting::Entity as Accounting;
pub use accounting_line::Entity as AccountingLine;
pub use financial_year::Entity as FinancialYear;
pub use ledger::Entity as Ledger;
pub use location::Entity as Location;
pub use recipe::Entity as Recipe;
pub use recipe_line::Entity as RecipeLine;
pub use stock_movement::Entity as StockMovement;
pub use transaction::Entity as Transaction;
pub use transaction_line::Entity as TransactionLine;
