//! Abacus command-line calculator
//!
//! Subcommands evaluate, plot or explain a single expression; with no
//! subcommand an interactive session runs on stdin. Logs go to stderr
//! (`RUST_LOG=debug` for evaluation details) so stdout stays clean.

mod config;
mod repl;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use abacus::{Calculator, Engine, EvaluationResult, FailureKind, FunctionSampler, PlotState, SampleOutcome};
use abacus_assist::{explanation_text, solution_text, Assistant, ExplanationRequest, GeminiAssistant, GeminiConfig};
use abacus_core::AngleMode;
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::config::Config;
use crate::repl::{write_functions, write_plot, Repl};

#[derive(Parser)]
#[command(
    name = "abacus",
    version,
    about = "Scientific calculator with high-precision evaluation and function plotting"
)]
struct Cli {
    /// Config file (default: $ABACUS_CONFIG or ~/.config/abacus/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Angle mode for trig arguments: deg or rad (overrides the config)
    #[arg(long, global = true)]
    mode: Option<AngleMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression
    Eval {
        /// Expression, e.g. "sin(30) + 2^10"
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sample a function of x over [-10, 10] in steps of 0.5
    Plot {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an expression and ask the assistant to explain the result
    Explain {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Ask the assistant to solve a word problem step by step
    Solve {
        #[arg(required = true, num_args = 1..)]
        problem: Vec<String>,
    },

    /// List functions and constants, or show help for one name
    Functions {
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active configuration
    Config,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    let calc = build_calculator(&cfg, cli.mode);
    tracing::debug!(
        mode = %calc.mode(),
        precision = cfg.calculator.working_precision,
        "calculator ready"
    );

    match cli.command {
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            if interactive {
                eprintln!("abacus {} - :help for commands, :quit to leave", env!("CARGO_PKG_VERSION"));
            }
            let mut repl = Repl::new(calc, cfg.assistant.clone(), io::stdout().lock());
            repl.run(stdin.lock(), interactive)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Eval { expression, json }) => cmd_eval(calc, &expression.join(" "), json),
        Some(Commands::Plot { expression, json }) => cmd_plot(&calc, &expression.join(" "), json),
        Some(Commands::Explain { expression }) => cmd_explain(calc, &cfg, &expression.join(" ")),
        Some(Commands::Solve { problem }) => cmd_solve(&cfg, &problem.join(" ")),
        Some(Commands::Functions { name, json }) => cmd_functions(&calc, name.as_deref(), json),
        Some(Commands::Config) => cmd_config(&cfg, cli.config.as_deref()),
    }
}

fn build_calculator(cfg: &Config, mode_override: Option<AngleMode>) -> Calculator {
    let engine = Engine::new().with_precision(cfg.calculator.working_precision);
    Calculator::new(engine)
        .with_mode(mode_override.unwrap_or(cfg.calculator.mode))
        .with_strategy(cfg.calculator.normalization)
        .with_display_precision(cfg.calculator.display_precision)
}

fn cmd_eval(mut calc: Calculator, expression: &str, as_json: bool) -> Result<ExitCode> {
    let outcome = calc.evaluate_line(expression);
    let mode = calc.mode().label();

    match outcome {
        None => Ok(ExitCode::SUCCESS),
        Some(EvaluationResult::Success { formatted_value }) => {
            if as_json {
                let out = json!({
                    "expression": calc.expression(),
                    "result": formatted_value,
                    "mode": mode,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", formatted_value);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(EvaluationResult::Failure { kind }) => {
            if as_json {
                let out = json!({
                    "expression": calc.expression(),
                    "error": kind.message(),
                    "mode": mode,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                eprintln!("{}", kind.message());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_plot(calc: &Calculator, expression: &str, as_json: bool) -> Result<ExitCode> {
    let sampler = FunctionSampler::new(calc.engine().clone());
    let outcome = sampler.sample(expression);

    if as_json {
        let out = match &outcome {
            SampleOutcome::Ready(points) => json!({ "status": "ready", "points": points }),
            SampleOutcome::NotApplicable => json!({ "status": "not_applicable", "message": outcome.user_message() }),
            SampleOutcome::NoValidPoints => json!({ "status": "no_valid_points", "message": outcome.user_message() }),
            SampleOutcome::CompileFailed { message } => json!({
                "status": "compile_failed",
                "message": outcome.user_message(),
                "detail": message,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let state = PlotState {
            points: match &outcome {
                SampleOutcome::Ready(points) => points.clone(),
                _ => Vec::new(),
            },
            message: outcome.user_message().map(str::to_string),
        };
        write_plot(&mut io::stdout().lock(), &state)?;
    }

    Ok(match outcome {
        SampleOutcome::Ready(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn cmd_explain(mut calc: Calculator, cfg: &Config, expression: &str) -> Result<ExitCode> {
    calc.evaluate_line(expression);
    let Some(request) = calc.explanation_request() else {
        eprintln!("{}", FailureKind::SyntaxError.message());
        return Ok(ExitCode::FAILURE);
    };

    println!("{} = {}", request.expression, request.result);
    println!();
    println!("{}", explain_text(&cfg.assistant, &request));
    Ok(ExitCode::SUCCESS)
}

fn cmd_solve(cfg: &Config, problem: &str) -> Result<ExitCode> {
    println!("{}", solve_text(&cfg.assistant, problem));
    Ok(ExitCode::SUCCESS)
}

/// A missing key degrades to the fallback sentence like any other failure
fn explain_text(config: &GeminiConfig, request: &ExplanationRequest) -> String {
    explanation_text(GeminiAssistant::from_env(config.clone()).and_then(|a| a.explain(request)))
}

fn solve_text(config: &GeminiConfig, problem: &str) -> String {
    solution_text(GeminiAssistant::from_env(config.clone()).and_then(|a| a.solve_word_problem(problem)))
}

fn cmd_functions(calc: &Calculator, name: Option<&str>, as_json: bool) -> Result<ExitCode> {
    let registry = calc.engine().registry();

    if let Some(name) = name {
        match registry.help(Some(name)) {
            Ok(help) => {
                println!("{}", serde_json::to_string_pretty(&help)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("{}", err);
                Ok(ExitCode::FAILURE)
            }
        }
    } else if as_json {
        let constants: Vec<_> = registry
            .list_constants()
            .into_iter()
            .map(|c| json!({ "name": c.name, "description": c.description }))
            .collect();
        let out = json!({
            "functions": registry.list_functions(),
            "constants": constants,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        Ok(ExitCode::SUCCESS)
    } else {
        write_functions(&mut io::stdout().lock(), registry)?;
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_config(cfg: &Config, explicit: Option<&std::path::Path>) -> Result<ExitCode> {
    println!("Config: {}", config::show_config_path(explicit));
    println!();
    println!("[calculator]");
    println!("  mode = {}", cfg.calculator.mode);
    println!("  working_precision = {}", cfg.calculator.working_precision);
    println!("  display_precision = {}", cfg.calculator.display_precision);
    println!("  normalization = {:?}", cfg.calculator.normalization);
    println!();
    println!("[assistant]");
    println!("  endpoint = {}", cfg.assistant.endpoint);
    println!("  explain_model = {}", cfg.assistant.explain_model);
    println!("  solver_model = {}", cfg.assistant.solver_model);
    println!("  api_key_env = {}", cfg.assistant.api_key_env);
    println!("  timeout_secs = {}", cfg.assistant.timeout_secs);
    println!("  temperature = {}", cfg.assistant.temperature);
    println!("  top_p = {}", cfg.assistant.top_p);
    println!("  max_output_tokens = {}", cfg.assistant.max_output_tokens);
    println!("  thinking_budget = {}", cfg.assistant.thinking_budget);
    Ok(ExitCode::SUCCESS)
}
