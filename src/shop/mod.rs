//! Shop module - prices, budget, purchase ledger and the purchase flow

mod flow;
mod ledger;
mod prices;

pub use flow::{FlowPhase, PendingPurchase, PurchaseFlow};
pub use ledger::{Budget, PurchaseLedger, Receipt};
pub use prices::{ColorPrices, EnginePrices, PriceTable, WheelPrices};
