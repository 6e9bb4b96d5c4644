use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use eury_config::{parse_u32, BenchAssertion, BenchScript, CampaignStep, ExpectedStatus};
use eury_core::{CampaignSummary, StepStatus};
use eury_sim::{run_bench, BenchOptions, BenchOutcome};

const EXIT_PASS: u8 = 0;
const EXIT_ASSERT_FAIL: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

const RESULT_SCHEMA_VERSION: &str = "1.0";

#[derive(Parser, Debug)]
#[command(author, version, about = "EurySPACE bring-up bench", long_about = None)]
struct Cli {
    /// Enable debug-level tracing of register activity
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bring-up campaign on the simulated board.
    Run(RunArgs),

    /// Run the campaign from a bench script (YAML) and check its assertions.
    Test(TestArgs),
}

#[derive(Parser, Debug, Default)]
struct RunArgs {
    /// Word presented on the transceiver receive side (decimal or 0x hex)
    #[arg(long, value_parser = parse_u32)]
    rx_value: Option<u32>,

    /// Words streamed by the randomized transmit loop before stopping
    #[arg(long)]
    random_tx_words: Option<u64>,

    /// Register writes kept per peripheral in the snapshot
    #[arg(long)]
    trace_depth: Option<usize>,

    /// Do not echo console lines to stdout
    #[arg(long)]
    no_console_stdout: bool,

    /// Write the run report (JSON) to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TestArgs {
    /// Path to the bench script (YAML)
    #[arg(short = 'c', long)]
    script: PathBuf,

    /// Override the script's receive value
    #[arg(long, value_parser = parse_u32)]
    rx_value: Option<u32>,

    /// Override the script's random word budget
    #[arg(long)]
    random_tx_words: Option<u64>,

    /// Do not echo console lines to stdout (still captured for assertions)
    #[arg(long)]
    no_console_stdout: bool,

    /// Directory to write test artifacts (result.json, console.log)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    result_schema_version: &'static str,
    #[serde(flatten)]
    outcome: &'a BenchOutcome,
}

#[derive(Debug, Serialize)]
struct AssertionResult {
    assertion: BenchAssertion,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct TestResult {
    result_schema_version: &'static str,
    status: &'static str,
    summary: CampaignSummary,
    assertions: Vec<AssertionResult>,
    violations: Vec<String>,
    script: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => match run_interactive(args) {
            Ok(()) => ExitCode::from(EXIT_PASS),
            Err(e) => {
                error!("{:#}", e);
                ExitCode::from(EXIT_RUNTIME_ERROR)
            }
        },
        Commands::Test(args) => run_test(args),
    }
}

fn run_interactive(args: RunArgs) -> anyhow::Result<()> {
    let defaults = BenchOptions::default();
    let options = BenchOptions {
        rx_value: args.rx_value.unwrap_or(defaults.rx_value),
        random_tx_words: args.random_tx_words.unwrap_or(defaults.random_tx_words),
        trace_depth: args.trace_depth.unwrap_or(defaults.trace_depth),
        echo: !args.no_console_stdout,
    };

    info!("Starting EurySPACE bring-up bench");
    let outcome = run_bench(&options);
    log_summary(&outcome.summary);

    if let Some(path) = args.report {
        let report = RunReport {
            result_schema_version: RESULT_SCHEMA_VERSION,
            outcome: &outcome,
        };
        write_json(&path, &report)?;
        info!("Report written to {:?}", path);
    }

    // Step failures are reported on the console, never through the exit code.
    Ok(())
}

fn run_test(args: TestArgs) -> ExitCode {
    let script = match BenchScript::from_file(&args.script) {
        Ok(script) => script,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let options = BenchOptions {
        rx_value: args.rx_value.unwrap_or(script.board.rx_value),
        random_tx_words: args
            .random_tx_words
            .unwrap_or(script.limits.random_tx_words),
        trace_depth: script.limits.trace_depth,
        echo: !args.no_console_stdout,
    };
    if options.random_tx_words == 0 {
        error!("Limit 'random_tx_words' must be greater than zero");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    let outcome = run_bench(&options);
    log_summary(&outcome.summary);

    let assertions: Vec<AssertionResult> = script
        .assertions
        .iter()
        .map(|assertion| {
            let passed = check_assertion(assertion, &outcome);
            if !passed {
                error!("Assertion failed: {:?}", assertion);
            }
            AssertionResult {
                assertion: assertion.clone(),
                passed,
            }
        })
        .collect();
    let all_passed = assertions.iter().all(|a| a.passed);

    let result = TestResult {
        result_schema_version: RESULT_SCHEMA_VERSION,
        status: if all_passed { "pass" } else { "fail" },
        summary: outcome.summary,
        assertions,
        violations: outcome.snapshot.violations.clone(),
        script: args.script.clone(),
    };

    if let Some(dir) = &args.output_dir {
        if let Err(e) = write_artifacts(dir, &result, &outcome.console) {
            error!("{:#}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    }

    if all_passed {
        info!("All {} assertions passed", result.assertions.len());
        ExitCode::from(EXIT_PASS)
    } else {
        ExitCode::from(EXIT_ASSERT_FAIL)
    }
}

fn check_assertion(assertion: &BenchAssertion, outcome: &BenchOutcome) -> bool {
    match assertion {
        BenchAssertion::ConsoleContains(a) => outcome
            .console
            .iter()
            .any(|line| line.contains(&a.console_contains)),
        BenchAssertion::LedData(a) => outcome
            .board
            .led()
            .is_some_and(|led| led.data() == a.led_data),
        BenchAssertion::StepStatus(a) => {
            let status = step_status(&outcome.summary, a.step_status.step);
            match a.step_status.status {
                ExpectedStatus::Ok => status == StepStatus::Ok,
                ExpectedStatus::Ko => status == StepStatus::Ko,
            }
        }
    }
}

fn step_status(summary: &CampaignSummary, step: CampaignStep) -> StepStatus {
    match step {
        CampaignStep::VisualInit => summary.visual_init,
        CampaignStep::RxDefault => summary.rx_default,
        CampaignStep::TxAllZeros => summary.tx_all_zeros,
        CampaignStep::TxAllOnes => summary.tx_all_ones,
        CampaignStep::VisualStop => summary.visual_stop,
    }
}

fn log_summary(summary: &CampaignSummary) {
    info!(
        "init {:?}, rx {:?}, tx0 {:?}, tx1 {:?}, alternation {} iterations, {} random words, stop {:?}",
        summary.visual_init,
        summary.rx_default,
        summary.tx_all_zeros,
        summary.tx_all_ones,
        summary.alternation_iterations,
        summary.random_words,
        summary.visual_stop
    );
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))
}

fn write_artifacts(dir: &Path, result: &TestResult, console: &[String]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    write_json(&dir.join("result.json"), result)?;

    let mut log = console.join("\n");
    log.push('\n');
    let log_path = dir.join("console.log");
    std::fs::write(&log_path, log).with_context(|| format!("Failed to write {:?}", log_path))?;
    Ok(())
}
