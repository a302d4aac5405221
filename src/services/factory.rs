use std::sync::Arc;

use crate::{config::SettlementConfig, db::DbPool, events::EventSender};

use super::{
    orders::OrderService,
    settlement::{
        purchase_returns::PurchaseReturnService, purchases::PurchaseService,
        sale_returns::SaleReturnService, sales::SaleService, SettlementCore,
    },
};

/// The complete settlement service graph, built once from a connection
/// pool, the posting configuration, and an optional event channel.
#[derive(Clone)]
pub struct SettlementServices {
    pub sales: SaleService,
    pub sale_returns: SaleReturnService,
    pub purchases: PurchaseService,
    pub purchase_returns: PurchaseReturnService,
    pub orders: OrderService,
}

/// Builds every service over one shared [`SettlementCore`].
pub fn build_services(
    db: Arc<DbPool>,
    config: SettlementConfig,
    event_sender: Option<EventSender>,
) -> SettlementServices {
    let core = SettlementCore::new(db.clone(), config, event_sender.clone());
    SettlementServices {
        sales: SaleService::new(core.clone()),
        sale_returns: SaleReturnService::new(core.clone()),
        purchases: PurchaseService::new(core.clone()),
        purchase_returns: PurchaseReturnService::new(core),
        orders: OrderService::new(db, event_sender),
    }
}
