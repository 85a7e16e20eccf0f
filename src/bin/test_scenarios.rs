//! Scenario test runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                       # Run all tests
//!   cargo run --bin test-scenarios -- shop/              # Run category
//!   cargo run --bin test-scenarios -- shop/buy_red_paint # Run single test
//!   cargo run --bin test-scenarios -- --verbose          # Show details on failure
//!   cargo run --bin test-scenarios -- --threads 2        # Limit worker threads
//!   cargo run --bin test-scenarios -- --log-db db/scenarios.db  # Keep event logs

use rayon::prelude::*;
use std::env;
use std::path::{Path, PathBuf};

use garage::events::SqliteEventLogger;
use garage::testing::{
    SCENARIOS_DIR, TestResult, discover_tests, parser::parse_test_file, run_scenario,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut verbose = false;
    let mut filter: Option<String> = None;
    let mut threads = 0usize;
    let mut log_db: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--verbose" | "-v" => verbose = true,
            "--threads" | "-t" => {
                i += 1;
                threads = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(0);
            }
            "--log-db" => {
                i += 1;
                log_db = args.get(i).map(PathBuf::from);
            }
            arg if !arg.starts_with('-') => filter = Some(arg.to_string()),
            other => eprintln!("Ignoring unknown flag {}", other),
        }
        i += 1;
    }

    if threads > 0
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        eprintln!("Failed to configure thread pool: {}", e);
    }

    println!("Scenario Tests");
    println!("==============\n");

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.exists() {
        println!("No scenarios directory found at {}", SCENARIOS_DIR);
        println!("Create test files in tests/scenarios/");
        std::process::exit(1);
    }

    let tests = discover_tests(scenarios_path, filter.as_deref());

    if tests.is_empty() {
        println!("No test files found.");
        if let Some(f) = filter {
            println!("Filter: {}", f);
        }
        std::process::exit(1);
    }

    // Sessions are independent, so scenarios run in parallel; results keep file order
    let results: Vec<TestResult> = tests
        .par_iter()
        .map(|path| run_file(path, log_db.as_deref()))
        .collect();

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = 0;
    let mut current_category = String::new();

    for (test_path, result) in tests.iter().zip(&results) {
        let rel_path = test_path.strip_prefix(scenarios_path).unwrap_or(test_path);

        // Print category header
        if let Some(parent) = rel_path.parent() {
            let category = parent.to_string_lossy().to_string();
            if category != current_category && !category.is_empty() {
                if !current_category.is_empty() {
                    println!();
                }
                println!("{}/", category);
                current_category = category;
            }
        }

        let test_name = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        match result {
            TestResult::Pass { .. } => passed += 1,
            TestResult::Fail { .. } => failed += 1,
            TestResult::Error { .. } => errors += 1,
        }

        print_result(&test_name, result, verbose);
    }

    println!("\n==============");
    println!(
        "Results: {} passed, {} failed, {} errors",
        passed, failed, errors
    );

    if failed > 0 || errors > 0 {
        std::process::exit(1);
    }
}

fn run_file(path: &Path, log_db: Option<&Path>) -> TestResult {
    let test_def = match parse_test_file(path) {
        Ok(def) => def,
        Err(message) => return TestResult::Error { message },
    };

    let mut run = match run_scenario(&test_def) {
        Ok(run) => run,
        Err(message) => return TestResult::Error { message },
    };

    if let Some(db) = log_db {
        match SqliteEventLogger::new(db, &format!("scenario:{}", test_def.name)) {
            Ok(logger) => logger.log_events(&run.flow.events_mut().take_processed()),
            Err(e) => eprintln!("Failed to open {}: {}", db.display(), e),
        }
    }

    run.result
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { steps } => {
            println!("  {} {} PASS ({} steps)", name, dots, steps);
        }
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
