//! Event type definitions for the garage event log

use serde::{Deserialize, Serialize};

use crate::settings::GarageConfig;
use crate::tuning::{TuningCategory, TuningOption, VisualRequest};

/// Everything a tuning session reports, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GarageEvent {
    // === Session Events ===
    /// Session started (generated once per launch and after each reset)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },
    /// Configuration snapshot (logged after session start)
    Config(GarageConfig),
    /// Session reset to stock with the starting budget
    SessionReset { budget: u64 },

    // === Shop Events ===
    /// Player opened a category's option panel
    CategoryOpened { category: TuningCategory },
    /// Option shown on the car, not yet paid for
    OptionPreviewed { option: TuningOption, price: u64 },
    /// Pending preview reverted without buying
    PreviewCancelled { option: TuningOption },
    /// Purchase went through; `budget` is the balance after paying
    PurchaseConfirmed {
        option: TuningOption,
        price: u64,
        budget: u64,
    },
    /// Purchase refused for lack of money; preview was reverted
    PurchaseRejected {
        option: TuningOption,
        price: u64,
        budget: u64,
    },
    /// Every category purchased; the car may leave the garage
    AllPartsTuned,

    // === Renderer Requests ===
    Visual(VisualRequest),
}

impl GarageEvent {
    /// Get the 2-character type code for this event
    pub fn type_code(&self) -> &'static str {
        match self {
            GarageEvent::SessionStart { .. } => "SE",
            GarageEvent::Config(_) => "CF",
            GarageEvent::SessionReset { .. } => "RS",
            GarageEvent::CategoryOpened { .. } => "CO",
            GarageEvent::OptionPreviewed { .. } => "OP",
            GarageEvent::PreviewCancelled { .. } => "PC",
            GarageEvent::PurchaseConfirmed { .. } => "P+",
            GarageEvent::PurchaseRejected { .. } => "P-",
            GarageEvent::AllPartsTuned => "AT",
            GarageEvent::Visual(VisualRequest::SwapWheels { .. }) => "VW",
            GarageEvent::Visual(VisualRequest::ShakeBody) => "VS",
            GarageEvent::Visual(VisualRequest::SetPaint { .. }) => "VP",
        }
    }

    /// Readable name used by scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            GarageEvent::SessionStart { .. } => "SessionStart",
            GarageEvent::Config(_) => "Config",
            GarageEvent::SessionReset { .. } => "SessionReset",
            GarageEvent::CategoryOpened { .. } => "CategoryOpened",
            GarageEvent::OptionPreviewed { .. } => "OptionPreviewed",
            GarageEvent::PreviewCancelled { .. } => "PreviewCancelled",
            GarageEvent::PurchaseConfirmed { .. } => "PurchaseConfirmed",
            GarageEvent::PurchaseRejected { .. } => "PurchaseRejected",
            GarageEvent::AllPartsTuned => "AllPartsTuned",
            GarageEvent::Visual(VisualRequest::SwapWheels { .. }) => "SwapWheels",
            GarageEvent::Visual(VisualRequest::ShakeBody) => "ShakeBody",
            GarageEvent::Visual(VisualRequest::SetPaint { .. }) => "SetPaint",
        }
    }

    /// Category this event concerns, if any
    pub fn category(&self) -> Option<TuningCategory> {
        match self {
            GarageEvent::CategoryOpened { category } => Some(*category),
            GarageEvent::OptionPreviewed { option, .. }
            | GarageEvent::PreviewCancelled { option }
            | GarageEvent::PurchaseConfirmed { option, .. }
            | GarageEvent::PurchaseRejected { option, .. } => Some(option.category()),
            GarageEvent::Visual(VisualRequest::SwapWheels { .. }) => Some(TuningCategory::Wheels),
            GarageEvent::Visual(VisualRequest::SetPaint { .. }) => Some(TuningCategory::Color),
            _ => None,
        }
    }

    pub fn is_visual(&self) -> bool {
        matches!(self, GarageEvent::Visual(_))
    }
}
