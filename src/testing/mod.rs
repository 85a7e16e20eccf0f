//! Scenario testing system for deterministic garage sessions
//!
//! Scripted player actions from TOML files are replayed against a headless
//! `PurchaseFlow` and the resulting budget, ledger, tuning, stats and event
//! stream are checked against expectations.

pub mod assertions;
pub mod parser;
pub mod runner;

use std::fs;
use std::path::{Path, PathBuf};

pub use assertions::{AssertionError, CapturedEvent, FlowSnapshot, check_sequence, check_state};
pub use parser::{ExpectedEvent, Step, StepAction, TestDefinition, TestExpectations, TestSetup};
pub use runner::{ScenarioRun, TestResult, run_scenario, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";

/// All `.toml` scenarios under `base`, sorted, optionally filtered by a
/// substring of their relative path
pub fn discover_tests(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut tests = Vec::new();
    discover_tests_recursive(base, base, filter, &mut tests);
    tests.sort();
    tests
}

fn discover_tests_recursive(
    base: &Path,
    current: &Path,
    filter: Option<&str>,
    tests: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(current) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            discover_tests_recursive(base, &path, filter, tests);
        } else if path.extension().is_some_and(|e| e == "toml") {
            if let Some(f) = filter {
                let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy();
                if !rel.contains(f) {
                    continue;
                }
            }
            tests.push(path);
        }
    }
}
