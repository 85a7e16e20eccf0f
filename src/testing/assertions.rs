//! Assertion checking for scenario expectations

use super::parser::{ExpectedEvent, ExpectedTuning, TestExpectations};
use crate::events::GarageEvent;
use crate::shop::{FlowPhase, PurchaseFlow};
use crate::tuning::{
    DerivedPhysics, DisplayStats, TuningCategory, TuningOption, TuningSelection,
};

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with the step that produced it
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub step: usize,
    pub event_type: String,
    pub category: Option<TuningCategory>,
}

impl CapturedEvent {
    pub fn from_garage_event(step: usize, event: &GarageEvent) -> Self {
        Self {
            step,
            event_type: event.name().to_string(),
            category: event.category(),
        }
    }
}

/// Session state at the end of a scenario
#[derive(Debug, Clone)]
pub struct FlowSnapshot {
    pub budget: u64,
    pub ledger: Vec<TuningCategory>,
    pub tuning: TuningSelection,
    pub phase: FlowPhase,
    pub physics: DerivedPhysics,
    pub stats: DisplayStats,
    pub ready_to_ride: bool,
}

impl FlowSnapshot {
    pub fn capture(flow: &PurchaseFlow) -> Self {
        Self {
            budget: flow.budget(),
            ledger: flow.ledger().categories(),
            tuning: flow.current_tuning(),
            phase: flow.phase(),
            physics: *flow.tuning().derived(),
            stats: flow.display_stats(),
            ready_to_ride: flow.ready_to_ride(),
        }
    }
}

fn parse_category(name: &str) -> Result<TuningCategory, AssertionError> {
    TuningCategory::from_name(name).ok_or_else(|| AssertionError {
        message: format!("Unknown category '{}'", name),
        expected: "WHEELS, COLOR or ENGINE".to_string(),
        actual: name.to_string(),
    })
}

/// Check if captured events match the expected sequence
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let category = exp.category.as_deref().map(parse_category).transpose()?;

        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.event_type == exp.event
                && category.is_none_or(|c| cap.category == Some(c))
                && exp.step.is_none_or(|s| cap.step == s)
        });

        match found {
            Some((offset, _)) => captured_idx += offset + 1,
            None => {
                let category_str = exp
                    .category
                    .as_ref()
                    .map(|c| format!(" (category: {})", c))
                    .unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, category_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..].iter().map(|e| &e.event_type).collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Check that none of the forbidden events occurred
pub fn check_absent(absent: &[String], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    for name in absent {
        if let Some(cap) = captured.iter().find(|c| &c.event_type == name) {
            return Err(AssertionError {
                message: format!("Event '{}' should not occur", name),
                expected: "no such event".to_string(),
                actual: format!("emitted at step {}", cap.step),
            });
        }
    }
    Ok(())
}

/// Check end-of-scenario expectations against the session
pub fn check_state(expect: &TestExpectations, state: &FlowSnapshot) -> Result<(), AssertionError> {
    if let Some(budget) = expect.budget
        && state.budget != budget
    {
        return Err(AssertionError {
            message: "Budget check failed".to_string(),
            expected: budget.to_string(),
            actual: state.budget.to_string(),
        });
    }

    if let Some(ledger) = &expect.ledger {
        let expected = ledger
            .iter()
            .map(|name| parse_category(name))
            .collect::<Result<Vec<_>, _>>()?;
        if expected != state.ledger {
            return Err(AssertionError {
                message: "Ledger check failed".to_string(),
                expected: format!("{:?}", expected),
                actual: format!("{:?}", state.ledger),
            });
        }
    }

    if let Some(tuning) = &expect.tuning {
        check_tuning(tuning, &state.tuning)?;
    }

    if let Some(phase) = &expect.phase {
        let actual = match state.phase {
            FlowPhase::Idle => "Idle",
            FlowPhase::Browsing(_) => "Browsing",
            FlowPhase::Previewing(_) => "Previewing",
        };
        if !phase.eq_ignore_ascii_case(actual) {
            return Err(AssertionError {
                message: "Phase check failed".to_string(),
                expected: phase.clone(),
                actual: format!("{:?}", state.phase),
            });
        }
    }

    if let Some(ready) = expect.ready_to_ride
        && state.ready_to_ride != ready
    {
        return Err(AssertionError {
            message: "Ready-to-ride check failed".to_string(),
            expected: ready.to_string(),
            actual: state.ready_to_ride.to_string(),
        });
    }

    for check in &expect.checks {
        check_value(check, state)?;
    }

    Ok(())
}

fn check_tuning(expected: &ExpectedTuning, actual: &TuningSelection) -> Result<(), AssertionError> {
    let wanted = [
        (TuningCategory::Wheels, &expected.wheels),
        (TuningCategory::Color, &expected.color),
        (TuningCategory::Engine, &expected.engine),
    ];

    for (category, name) in wanted {
        let Some(name) = name else { continue };
        let option = TuningOption::parse(category, name).map_err(|e| AssertionError {
            message: format!("Invalid tuning expectation: {}", e),
            expected: format!("{} option", category),
            actual: name.clone(),
        })?;
        if actual.get(category) != option {
            return Err(AssertionError {
                message: format!("Tuning check failed for {}", category),
                expected: option.to_string(),
                actual: actual.get(category).to_string(),
            });
        }
    }
    Ok(())
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

fn check_value(check: &str, state: &FlowSnapshot) -> Result<(), AssertionError> {
    let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
        message: format!("Invalid check syntax: {}", check),
        expected: "format: 'property = value' or 'property > value'".to_string(),
        actual: check.to_string(),
    })?;

    let physics = &state.physics;
    let stats = &state.stats;
    match path {
        "max_speed" => check_float_comparison(path, physics.max_speed, operator, expected_value),
        "acceleration" => check_float_comparison(path, physics.acceleration, operator, expected_value),
        "power" => check_float_comparison(path, physics.power, operator, expected_value),
        "drag" | "drag_coefficient" => {
            check_float_comparison(path, physics.drag_coefficient, operator, expected_value)
        }
        "speed_kmh" => check_float_comparison(path, stats.speed_kmh as f32, operator, expected_value),
        "horse_power" => check_float_comparison(path, stats.horse_power as f32, operator, expected_value),
        "zero_to_hundred" => {
            let expected = expected_value.trim_matches('"');
            if stats.zero_to_hundred != expected {
                return Err(AssertionError {
                    message: format!("Check failed: {}", check),
                    expected: expected.to_string(),
                    actual: stats.zero_to_hundred.clone(),
                });
            }
            Ok(())
        }
        _ => Err(AssertionError {
            message: format!("Unknown check path '{}'", path),
            expected: "max_speed, acceleration, power, drag, speed_kmh, horse_power or zero_to_hundred"
                .to_string(),
            actual: path.to_string(),
        }),
    }
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.2})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}
