//! Line-oriented calculator session on stdin
//!
//! Plain lines are evaluated; lines starting with `:` are commands.

use std::io::{BufRead, Write};

use abacus::{Calculator, EvaluationResult, PlotState, PluginRegistry};
use abacus_assist::{explain_or_fallback, solve_or_fallback, Assistant, GeminiAssistant, GeminiConfig};
use abacus_core::AngleMode;
use anyhow::Result;
use tracing::warn;

const HELP: &str = "\
Type an expression to evaluate it, e.g. sin(30) + 2^10 or ans * 2.

Commands:
  :mode [deg|rad]   show or set the angle mode
  :plot [expr]      sample expr (or the current expression) over x in [-10, 10]
  :history          list past calculations, newest first
  :recall N         restore history entry N
  :clear-history    forget all history entries
  :explain          ask the assistant to explain the current result
  :solve TEXT       ask the assistant to solve a word problem
  :functions        list available functions and constants
  :help             show this help
  :quit             leave";

const NO_RESULT_MESSAGE: &str = "Please perform a calculation first to get an explanation.";

enum Flow {
    Continue,
    Quit,
}

pub struct Repl<W: Write> {
    calc: Calculator,
    assistant_config: GeminiConfig,
    assistant: Option<Box<dyn Assistant>>,
    out: W,
}

impl<W: Write> Repl<W> {
    pub fn new(calc: Calculator, assistant_config: GeminiConfig, out: W) -> Self {
        Self {
            calc,
            assistant_config,
            assistant: None,
            out,
        }
    }

    /// Use a ready-made assistant instead of building one from the environment
    pub fn with_assistant(mut self, assistant: Box<dyn Assistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    /// Read lines until EOF or `:quit`
    pub fn run(&mut self, input: impl BufRead, interactive: bool) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if interactive {
                write!(self.out, "[{}] > ", self.calc.mode())?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if let Flow::Quit = self.handle_line(&line?)? {
                break;
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(command) = line.strip_prefix(':') else {
            self.evaluate(line)?;
            return Ok(Flow::Continue);
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "q" | "quit" | "exit" => return Ok(Flow::Quit),
            "help" | "h" => writeln!(self.out, "{}", HELP)?,
            "mode" => self.mode(arg)?,
            "plot" => self.plot(arg)?,
            "history" => self.history()?,
            "recall" => self.recall(arg)?,
            "clear-history" => {
                self.calc.clear_history();
                writeln!(self.out, "History cleared")?;
            }
            "explain" => self.explain()?,
            "solve" => self.solve(arg)?,
            "functions" => self.functions()?,
            other => writeln!(self.out, "Unknown command :{} (try :help)", other)?,
        }
        Ok(Flow::Continue)
    }

    fn evaluate(&mut self, line: &str) -> Result<()> {
        match self.calc.evaluate_line(line) {
            Some(EvaluationResult::Success { formatted_value }) => {
                writeln!(self.out, "= {}", formatted_value)?
            }
            Some(EvaluationResult::Failure { kind }) => writeln!(self.out, "{}", kind.message())?,
            None => {}
        }
        Ok(())
    }

    fn mode(&mut self, arg: &str) -> Result<()> {
        if !arg.is_empty() {
            match arg.parse::<AngleMode>() {
                Ok(mode) => self.calc.set_mode(mode),
                Err(err) => {
                    writeln!(self.out, "{}", err.message)?;
                    return Ok(());
                }
            }
        }
        writeln!(self.out, "Mode: {}", self.calc.mode())?;
        Ok(())
    }

    fn plot(&mut self, arg: &str) -> Result<()> {
        if !arg.is_empty() {
            self.calc.set_expression(arg);
        }
        let state = self.calc.plot();
        write_plot(&mut self.out, state)
    }

    fn history(&mut self) -> Result<()> {
        let history = &self.calc.session().history;
        if history.is_empty() {
            writeln!(self.out, "No history yet")?;
            return Ok(());
        }
        for (i, entry) in history.newest_first().enumerate() {
            writeln!(
                self.out,
                "{:>3}. {} = {}  ({})",
                i + 1,
                entry.expression,
                entry.result,
                entry.timestamp.format("%H:%M:%S")
            )?;
        }
        Ok(())
    }

    fn recall(&mut self, arg: &str) -> Result<()> {
        let id = arg
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| self.calc.session().history.newest_first().nth(n))
            .map(|entry| entry.id);

        let restored = id.map_or(false, |id| self.calc.select_history(id));
        if restored {
            let result = self.calc.session().result.as_deref().unwrap_or_default();
            writeln!(self.out, "{} = {}", self.calc.expression(), result)?;
        } else {
            writeln!(self.out, "No history entry {:?} (see :history)", arg)?;
        }
        Ok(())
    }

    fn explain(&mut self) -> Result<()> {
        let Some(request) = self.calc.explanation_request() else {
            writeln!(self.out, "{}", NO_RESULT_MESSAGE)?;
            return Ok(());
        };
        let text = match self.assistant() {
            Some(assistant) => explain_or_fallback(assistant, &request),
            None => return self.missing_key(),
        };
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn solve(&mut self, problem: &str) -> Result<()> {
        if problem.is_empty() {
            writeln!(self.out, "Usage: :solve TEXT")?;
            return Ok(());
        }
        let text = match self.assistant() {
            Some(assistant) => solve_or_fallback(assistant, problem),
            None => return self.missing_key(),
        };
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn functions(&mut self) -> Result<()> {
        write_functions(&mut self.out, self.calc.engine().registry())
    }

    /// Build the remote assistant on first use
    fn assistant(&mut self) -> Option<&dyn Assistant> {
        if self.assistant.is_none() {
            match GeminiAssistant::from_env(self.assistant_config.clone()) {
                Ok(gemini) => self.assistant = Some(Box::new(gemini)),
                Err(err) => warn!(error = %err, "assistant not available"),
            }
        }
        self.assistant.as_deref()
    }

    fn missing_key(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "Assistant unavailable: set ${} to enable explanations",
            self.assistant_config.api_key_env
        )?;
        Ok(())
    }
}

/// Points as a two-column table, or the message shown instead of a chart
pub fn write_plot(out: &mut impl Write, state: &PlotState) -> Result<()> {
    if let Some(message) = &state.message {
        writeln!(out, "{}", message)?;
        return Ok(());
    }
    writeln!(out, "{:>8}  {:>14}", "x", "y")?;
    for point in &state.points {
        writeln!(out, "{:>8}  {:>14}", point.x, point.y)?;
    }
    Ok(())
}

/// One line per function, then the constants
pub fn write_functions(out: &mut impl Write, registry: &PluginRegistry) -> Result<()> {
    for meta in registry.list_functions() {
        writeln!(out, "  {:<22} {}", meta.usage, meta.description)?;
    }
    let constants: Vec<&str> = registry
        .list_constants()
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    writeln!(out, "Constants: {}", constants.join(", "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use abacus_assist::{AssistError, ExplanationRequest};

    struct Echo;

    impl Assistant for Echo {
        fn explain(&self, request: &ExplanationRequest) -> Result<String, AssistError> {
            Ok(format!("{} is {}", request.expression, request.result))
        }

        fn solve_word_problem(&self, problem: &str) -> Result<String, AssistError> {
            Ok(format!("solved: {}", problem))
        }
    }

    fn run(script: &str) -> String {
        let mut repl = Repl::new(Calculator::default(), GeminiConfig::default(), Vec::new())
            .with_assistant(Box::new(Echo));
        repl.run(script.as_bytes(), false).unwrap();
        String::from_utf8(repl.out).unwrap()
    }

    #[test]
    fn test_evaluates_lines() {
        let out = run("2+2\n1/3\n\n2+\n");
        assert_eq!(out, "= 4\n= 0.33333333333333\nSyntax Error\n");
    }

    #[test]
    fn test_mode_switch() {
        let out = run("sin(90)\n:mode rad\nsin(90)\n:mode grad\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "= 1");
        assert_eq!(lines[1], "Mode: RAD");
        assert_eq!(lines[2], "= 0.89399666360056");
        assert!(lines[3].contains("Unknown angle mode"), "got {}", lines[3]);
    }

    #[test]
    fn test_history_and_recall() {
        let out = run("1+1\n2+2\n:history\n:recall 2\n:recall 9\n");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].starts_with("  1. 2+2 = 4"), "got {}", lines[2]);
        assert!(lines[3].starts_with("  2. 1+1 = 2"), "got {}", lines[3]);
        assert_eq!(lines[4], "1+1 = 2");
        assert!(lines[5].starts_with("No history entry"), "got {}", lines[5]);
    }

    #[test]
    fn test_clear_history() {
        let out = run("1+1\n:clear-history\n:history\n");
        assert!(out.ends_with("History cleared\nNo history yet\n"), "got {}", out);
    }

    #[test]
    fn test_ans_in_typed_line() {
        let out = run("6*7\nans + 1\n");
        assert_eq!(out, "= 42\n= 43\n");
    }

    #[test]
    fn test_plot_messages() {
        let out = run(":plot 5+3\n:plot x +\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], abacus::PROMPT_MESSAGE);
        assert_eq!(lines[1], abacus::COMPILE_FAILED_MESSAGE);
    }

    #[test]
    fn test_plot_table() {
        let out = run(":plot x^2\n");
        // header plus 41 samples
        assert_eq!(out.lines().count(), 42);
        assert!(out.lines().nth(1).unwrap().trim_start().starts_with("-10"));
    }

    #[test]
    fn test_explain_needs_result() {
        let out = run(":explain\nsqrt(16)\n:explain\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], NO_RESULT_MESSAGE);
        assert_eq!(lines[2], "sqrt(16) is 4");
    }

    #[test]
    fn test_solve() {
        let out = run(":solve two apples plus three\n:solve\n");
        assert_eq!(out, "solved: two apples plus three\nUsage: :solve TEXT\n");
    }

    #[test]
    fn test_functions_listing() {
        let out = run(":functions\n");
        assert!(out.contains("log(x) | log(x, base)"), "got {}", out);
        assert!(out.contains("Constants: e, pi, π"), "got {}", out);
    }

    #[test]
    fn test_quit_stops_reading() {
        let out = run("1+1\n:quit\n2+2\n");
        assert_eq!(out, "= 2\n");
    }

    #[test]
    fn test_unknown_command() {
        let out = run(":frobnicate\n");
        assert!(out.starts_with("Unknown command :frobnicate"));
    }
}
