//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::shop::PriceTable;
use crate::tuning::PhysicsBaseline;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Session the scenario starts from; anything omitted uses the defaults
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    pub budget: Option<u64>,
    pub baseline: Option<PhysicsBaseline>,
    pub prices: Option<PriceTable>,
}

/// One player action, optionally expected to fail
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: StepAction,
    /// `TuningError::kind()` this step must fail with
    pub expect_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    SelectCategory {
        category: String,
    },
    /// `option` is a name within `category`, or `CATEGORY:NAME` to send a
    /// mismatched pair
    SelectOption {
        category: String,
        option: String,
    },
    Confirm,
    Cancel,
    Reset,
}

impl StepAction {
    pub fn name(&self) -> &'static str {
        match self {
            StepAction::SelectCategory { .. } => "select_category",
            StepAction::SelectOption { .. } => "select_option",
            StepAction::Confirm => "confirm",
            StepAction::Cancel => "cancel",
            StepAction::Reset => "reset",
        }
    }
}

/// Expected outcome after all steps ran
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    pub budget: Option<u64>,
    /// Purchased categories in purchase order
    pub ledger: Option<Vec<String>>,
    pub tuning: Option<ExpectedTuning>,
    /// "Idle", "Browsing" or "Previewing"
    pub phase: Option<String>,
    pub ready_to_ride: Option<bool>,
    /// Checks on derived physics and display stats, e.g. `speed_kmh = 270`
    #[serde(default)]
    pub checks: Vec<String>,
    /// Events that must appear in this order (other events may sit between)
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Events that must not appear at all
    #[serde(default)]
    pub absent: Vec<String>,
}

/// Committed selection; omitted categories are not checked
#[derive(Debug, Default, Deserialize)]
pub struct ExpectedTuning {
    pub wheels: Option<String>,
    pub color: Option<String>,
    pub engine: Option<String>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub category: Option<String>,
    /// Index of the step that must have produced the event
    pub step: Option<usize>,
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
