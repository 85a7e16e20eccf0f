//! Scenario execution engine
//!
//! Scenarios run headless against a bare `PurchaseFlow`; no Bevy app is
//! needed since the session is plain data.

use bevy::prelude::*;

use crate::error::TuningError;
use crate::settings::GarageConfig;
use crate::shop::{PurchaseFlow, Receipt};
use crate::tuning::{TuningCategory, TuningOption};

use super::assertions::{
    AssertionError, CapturedEvent, FlowSnapshot, check_absent, check_sequence, check_state,
};
use super::parser::{Step, StepAction, TestDefinition};

/// Simulated time between steps, so logged events get distinct timestamps
const STEP_SECS: f32 = 0.1;

/// Result of running a scenario
#[derive(Debug)]
pub enum TestResult {
    Pass { steps: usize },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Everything a scenario run produced
pub struct ScenarioRun {
    pub flow: PurchaseFlow,
    pub events: Vec<CapturedEvent>,
    pub result: TestResult,
}

/// Build the session a scenario starts from
pub fn build_flow(test: &TestDefinition) -> Result<PurchaseFlow, String> {
    let mut config = GarageConfig::default();
    if let Some(budget) = test.setup.budget {
        config.starting_budget = budget;
    }
    if let Some(baseline) = test.setup.baseline {
        config.baseline = baseline;
    }
    if let Some(prices) = test.setup.prices {
        config.prices = prices;
    }
    config.validate()?;
    Ok(PurchaseFlow::from_config(&config))
}

fn category_named(name: &str) -> Result<TuningCategory, String> {
    TuningCategory::from_name(name).ok_or_else(|| format!("Unknown category '{}'", name))
}

/// Resolve a step's option. `CATEGORY:NAME` addresses another category on
/// purpose; an unknown name is the step's own `InvalidOption` outcome.
fn resolve_option(category: TuningCategory, option: &str) -> Result<Result<TuningOption, TuningError>, String> {
    match option.split_once(':') {
        Some((other, name)) => Ok(TuningOption::parse(category_named(other)?, name)),
        None => Ok(TuningOption::parse(category, option)),
    }
}

/// Apply one step to the session
fn apply_step(flow: &mut PurchaseFlow, step: &Step) -> Result<Result<Option<Receipt>, TuningError>, String> {
    let outcome = match &step.action {
        StepAction::SelectCategory { category } => {
            flow.select_category(category_named(category)?).map(|_| None)
        }
        StepAction::SelectOption { category, option } => {
            let category = category_named(category)?;
            match resolve_option(category, option)? {
                Ok(option) => flow.select_option(category, option).map(|_| None),
                Err(err) => Err(err),
            }
        }
        StepAction::Confirm => flow.confirm_selection(),
        StepAction::Cancel => {
            flow.cancel_selection();
            Ok(None)
        }
        StepAction::Reset => {
            flow.reset();
            Ok(None)
        }
    };
    Ok(outcome)
}

fn check_step_outcome(
    index: usize,
    step: &Step,
    outcome: &Result<Option<Receipt>, TuningError>,
) -> Result<(), AssertionError> {
    match (outcome, &step.expect_error) {
        (Ok(_), None) => Ok(()),
        (Err(err), Some(kind)) if err.kind() == kind => Ok(()),
        (Ok(_), Some(kind)) => Err(AssertionError {
            message: format!("Step #{} '{}' should have failed", index + 1, step.action.name()),
            expected: kind.clone(),
            actual: "Ok".to_string(),
        }),
        (Err(err), expected) => Err(AssertionError {
            message: format!("Step #{} '{}' failed unexpectedly: {}", index + 1, step.action.name(), err),
            expected: expected.clone().unwrap_or_else(|| "Ok".to_string()),
            actual: err.kind().to_string(),
        }),
    }
}

/// Run a scenario and keep the session and captured events
pub fn run_scenario(test: &TestDefinition) -> Result<ScenarioRun, String> {
    let mut flow = build_flow(test)?;
    let mut events = Vec::new();

    for (index, step) in test.steps.iter().enumerate() {
        flow.events_mut().update_time(index as f32 * STEP_SECS);
        let outcome = apply_step(&mut flow, step)?;
        events.extend(
            flow.events_mut()
                .drain()
                .iter()
                .map(|e| CapturedEvent::from_garage_event(index, &e.event)),
        );

        if let Err(error) = check_step_outcome(index, step, &outcome) {
            debug!("Scenario '{}' stopped at step {}", test.name, index + 1);
            return Ok(ScenarioRun {
                flow,
                events,
                result: TestResult::Fail { error },
            });
        }
    }

    let state = FlowSnapshot::capture(&flow);
    let result = check_sequence(&test.expect.sequence, &events)
        .and_then(|_| check_absent(&test.expect.absent, &events))
        .and_then(|_| check_state(&test.expect, &state));

    let result = match result {
        Ok(()) => TestResult::Pass {
            steps: test.steps.len(),
        },
        Err(error) => TestResult::Fail { error },
    };

    Ok(ScenarioRun {
        flow,
        events,
        result,
    })
}

/// Run a single scenario and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    match run_scenario(test) {
        Ok(run) => run.result,
        Err(message) => TestResult::Error { message },
    }
}
