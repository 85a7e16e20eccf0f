//! Errors raised by tuning and shop operations
//!
//! Every operation that returns one of these leaves the session exactly as it
//! was before the call (or fully reverted, for `InsufficientFunds`).

use crate::tuning::TuningCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuningError {
    /// Option is not part of the category's closed set
    InvalidOption {
        category: TuningCategory,
        option: String,
    },
    /// Category was already purchased this session
    CategoryLocked(TuningCategory),
    /// Price exceeded the budget at confirm time; the preview was cancelled
    InsufficientFunds { price: u64, budget: u64 },
}

impl TuningError {
    /// Short name used in logs and scenario expectations
    pub fn kind(&self) -> &'static str {
        match self {
            TuningError::InvalidOption { .. } => "InvalidOption",
            TuningError::CategoryLocked(_) => "CategoryLocked",
            TuningError::InsufficientFunds { .. } => "InsufficientFunds",
        }
    }
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::InvalidOption { category, option } => {
                write!(f, "'{}' is not a {} option", option, category)
            }
            TuningError::CategoryLocked(category) => {
                write!(f, "{} already purchased", category)
            }
            TuningError::InsufficientFunds { price, budget } => {
                write!(f, "Not enough money! (price {}, budget {})", price, budget)
            }
        }
    }
}

impl std::error::Error for TuningError {}
