//! Budget and the record of purchased categories

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::tuning::{TuningCategory, TuningOption};

/// Non-negative balance, only ever debited by affordable purchases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget(u64);

impl Budget {
    pub fn new(balance: u64) -> Self {
        Self(balance)
    }

    pub fn balance(&self) -> u64 {
        self.0
    }

    pub fn can_afford(&self, price: u64) -> bool {
        price <= self.0
    }

    /// Debit `price`, returning the new balance. Leaves the balance untouched
    /// when it cannot cover the price.
    pub fn debit(&mut self, price: u64) -> Result<u64, TuningError> {
        if !self.can_afford(price) {
            return Err(TuningError::InsufficientFunds {
                price,
                budget: self.0,
            });
        }
        self.0 -= price;
        Ok(self.0)
    }
}

/// A confirmed purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub option: TuningOption,
    pub price: u64,
    /// Balance left after paying
    pub budget_after: u64,
}

impl Receipt {
    pub fn category(&self) -> TuningCategory {
        self.option.category()
    }
}

/// Categories purchased this session, in purchase order.
/// Grows monotonically; only a session reset empties it.
#[derive(Debug, Clone, Default)]
pub struct PurchaseLedger {
    receipts: Vec<Receipt>,
}

impl PurchaseLedger {
    pub fn contains(&self, category: TuningCategory) -> bool {
        self.receipts.iter().any(|r| r.category() == category)
    }

    /// Record a purchase. Returns false if the category was already locked.
    pub fn record(&mut self, receipt: Receipt) -> bool {
        if self.contains(receipt.category()) {
            return false;
        }
        self.receipts.push(receipt);
        true
    }

    pub fn categories(&self) -> Vec<TuningCategory> {
        self.receipts.iter().map(Receipt::category).collect()
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Every category has been purchased
    pub fn is_complete(&self) -> bool {
        TuningCategory::ALL.iter().all(|c| self.contains(*c))
    }

    pub fn total_spent(&self) -> u64 {
        self.receipts.iter().map(|r| r.price).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.receipts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{ColorOption, EngineOption, WheelOption};

    #[test]
    fn test_budget_debit() {
        let mut budget = Budget::new(150_000);
        assert_eq!(budget.debit(10_000), Ok(140_000));
        assert_eq!(budget.balance(), 140_000);
    }

    #[test]
    fn test_budget_exact_amount_is_affordable() {
        let mut budget = Budget::new(5_000);
        assert_eq!(budget.debit(5_000), Ok(0));
        assert_eq!(budget.debit(0), Ok(0));
    }

    #[test]
    fn test_budget_insufficient_leaves_balance() {
        let mut budget = Budget::new(5_000);
        let err = budget.debit(35_000).unwrap_err();
        assert_eq!(err, TuningError::InsufficientFunds { price: 35_000, budget: 5_000 });
        assert_eq!(budget.balance(), 5_000);
    }

    #[test]
    fn test_ledger_locks_once() {
        let mut ledger = PurchaseLedger::default();
        let red = Receipt {
            option: TuningOption::Color(ColorOption::Red),
            price: 10_000,
            budget_after: 140_000,
        };
        assert!(ledger.record(red));
        assert!(ledger.contains(TuningCategory::Color));
        assert!(!ledger.record(Receipt {
            option: TuningOption::Color(ColorOption::Orange),
            ..red
        }));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.receipts()[0].option, TuningOption::Color(ColorOption::Red));
    }

    #[test]
    fn test_ledger_complete() {
        let mut ledger = PurchaseLedger::default();
        for option in [
            TuningOption::Wheels(WheelOption::Basic),
            TuningOption::Color(ColorOption::Red),
            TuningOption::Engine(EngineOption::Street),
        ] {
            assert!(!ledger.is_complete());
            ledger.record(Receipt { option, price: 1, budget_after: 0 });
        }
        assert!(ledger.is_complete());
        assert_eq!(ledger.total_spent(), 3);
    }
}
