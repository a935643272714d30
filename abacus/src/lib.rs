//! Abacus - scientific calculator core
//!
//! Text in, formatted result out. The `Engine` parses and evaluates at
//! 64 significant digits; `ScalarEvaluator` adds degree normalization,
//! display formatting and session bookkeeping; `FunctionSampler` turns a
//! one-variable expression into plot points; `Calculator` ties them to a
//! keypad-style expression buffer.

mod ast;
mod parser;
mod eval;
mod engine;
mod normalize;
mod scalar;
mod sampler;
mod history;
mod session;
mod calculator;

pub use ast::{Expr, BinOp, UnaryOp, AngleUnit};
pub use parser::parse_expr;
pub use eval::Evaluator;
pub use engine::{Engine, CompiledExpression};
pub use normalize::{NormalizeStrategy, normalize_text, normalize_tree};
pub use scalar::{ScalarEvaluator, EvaluationResult, FailureKind, DISPLAY_PRECISION};
pub use sampler::{
    FunctionSampler, SampleOutcome, SamplePoint, PLOT_VARIABLE,
    PROMPT_MESSAGE, COMPILE_FAILED_MESSAGE, NO_VALID_POINTS_MESSAGE,
};
pub use history::{HistoryEntry, Ledger};
pub use session::Session;
pub use calculator::{Calculator, ExplanationRequest, PlotState, expand_ans, ANS_TOKEN};

pub use abacus_core::{AbacusError, AngleMode, Number};
pub use abacus_plugin::{PluginRegistry, FunctionMeta, ConstantDef};

#[cfg(test)]
mod tests {
    use super::*;

    fn deg() -> ScalarEvaluator {
        ScalarEvaluator::default()
    }

    mod scalar_tests {
        use super::*;

        #[test]
        fn test_precision_bound() {
            assert_eq!(deg().evaluate_scalar("1/3", AngleMode::Deg).unwrap(), "0.33333333333333");
            assert_eq!(deg().evaluate_scalar("2/3", AngleMode::Deg).unwrap(), "0.66666666666667");
        }

        #[test]
        fn test_degree_normalization() {
            assert_eq!(deg().evaluate_scalar("sin(90)", AngleMode::Deg).unwrap(), "1");
            assert_eq!(deg().evaluate_scalar("sin(90)", AngleMode::Rad).unwrap(), "0.89399666360056");
            assert_eq!(deg().evaluate_scalar("cos(60)", AngleMode::Deg).unwrap(), "0.5");
            assert_eq!(deg().evaluate_scalar("sin(30)", AngleMode::Deg).unwrap(), "0.5");
        }

        #[test]
        fn test_textual_strategy_matches_on_flat_input() {
            let textual = ScalarEvaluator::default().with_strategy(NormalizeStrategy::Textual);
            for input in ["sin(90)", "cos(60) + tan(45)", "2*sin(30)"] {
                assert_eq!(
                    textual.evaluate_scalar(input, AngleMode::Deg).unwrap(),
                    deg().evaluate_scalar(input, AngleMode::Deg).unwrap(),
                    "input {}", input
                );
            }
        }

        #[test]
        fn test_strategies_differ_on_nesting() {
            // The text rewrite closes the tag at the first `)`, leaving `+ 60` in radians
            let input = "sin((30) + 60)";
            assert_eq!(deg().evaluate_scalar(input, AngleMode::Deg).unwrap(), "1");
            let textual = ScalarEvaluator::default().with_strategy(NormalizeStrategy::Textual);
            assert_ne!(textual.evaluate_scalar(input, AngleMode::Deg).unwrap(), "1");
        }

        #[test]
        fn test_explicit_units_under_operators() {
            assert_eq!(deg().evaluate_scalar("sin(-90 deg)", AngleMode::Deg).unwrap(), "-1");
            assert_eq!(deg().evaluate_scalar("sin(2*45 deg)", AngleMode::Deg).unwrap(), "1");
            assert_eq!(
                deg().evaluate_scalar("sin(-90 deg)", AngleMode::Deg),
                deg().evaluate_scalar("sin(-90 deg)", AngleMode::Rad)
            );
        }

        #[test]
        fn test_exponent_overflow_fails() {
            assert!(deg().evaluate_scalar("(10^(5*10^18))^2", AngleMode::Rad).is_err());
            assert!(deg().evaluate_scalar("1e5000000000000000000", AngleMode::Rad).is_err());
            assert!(deg().evaluate_scalar("1e999999999 * 1e999999999", AngleMode::Rad).is_err());
        }

        #[test]
        fn test_sin_of_huge_angle_fails() {
            assert!(deg().evaluate_scalar("sin(1e450)", AngleMode::Rad).is_err());
            assert!(deg().evaluate_scalar("sin(1e450)", AngleMode::Deg).is_err());
        }

        #[test]
        fn test_tan_at_right_angle_fails() {
            assert!(deg().evaluate_scalar("tan(90)", AngleMode::Deg).is_err());
        }

        #[test]
        fn test_determinism() {
            let evaluator = deg();
            let first = evaluator.evaluate_scalar("sqrt(2) * pi / 7", AngleMode::Rad);
            let second = evaluator.evaluate_scalar("sqrt(2) * pi / 7", AngleMode::Rad);
            assert_eq!(first, second);
        }

        #[test]
        fn test_display_precision_override() {
            let short = ScalarEvaluator::default().with_display_precision(4);
            assert_eq!(short.evaluate_scalar("pi", AngleMode::Rad).unwrap(), "3.142");
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_empty_input_is_noop() {
            let mut session = Session::default();
            session.error = Some("Syntax Error".to_string());
            assert_eq!(deg().evaluate("", &mut session), None);
            assert_eq!(deg().evaluate("   ", &mut session), None);
            assert_eq!(session.error.as_deref(), Some("Syntax Error"));
            assert!(session.history.is_empty());
        }

        #[test]
        fn test_success_appends_history() {
            let mut session = Session::default();
            let outcome = deg().evaluate("2+2", &mut session);
            assert_eq!(
                outcome,
                Some(EvaluationResult::Success { formatted_value: "4".to_string() })
            );
            assert_eq!(session.history.len(), 1);
            let entry = &session.history.entries()[0];
            assert_eq!(entry.expression, "2+2");
            assert_eq!(entry.result, "4");
            assert_eq!(session.result.as_deref(), Some("4"));
            assert_eq!(session.last_result.as_deref(), Some("4"));
        }

        #[test]
        fn test_history_keeps_typed_text() {
            let mut session = Session::default();
            deg().evaluate("sin(90)", &mut session);
            assert_eq!(session.history.entries()[0].expression, "sin(90)");
        }

        #[test]
        fn test_failure_reports_syntax_error() {
            let mut session = Session::default();
            deg().evaluate("2+2", &mut session);
            let outcome = deg().evaluate("2+", &mut session);
            assert_eq!(
                outcome,
                Some(EvaluationResult::Failure { kind: FailureKind::SyntaxError })
            );
            assert_eq!(session.error.as_deref(), Some("Syntax Error"));
            assert_eq!(session.history.len(), 1);
            assert_eq!(session.last_result.as_deref(), Some("4"));
            assert_eq!(session.result.as_deref(), Some("4"));
        }

        #[test]
        fn test_attempt_clears_previous_error() {
            let mut session = Session::default();
            deg().evaluate("1/0", &mut session);
            assert!(session.error.is_some());
            deg().evaluate("3*3", &mut session);
            assert_eq!(session.error, None);
            assert_eq!(session.result.as_deref(), Some("9"));
        }

        #[test]
        fn test_session_mode_drives_normalization() {
            let mut session = Session::new(AngleMode::Rad);
            deg().evaluate("sin(90)", &mut session);
            assert_eq!(session.result.as_deref(), Some("0.89399666360056"));
        }
    }

    mod history_tests {
        use super::*;

        #[test]
        fn test_newest_first_order() {
            let mut ledger = Ledger::new();
            ledger.append("1+1", "2");
            ledger.append("2+2", "4");
            ledger.append("3+3", "6");
            let shown: Vec<&str> = ledger.newest_first().map(|e| e.expression.as_str()).collect();
            assert_eq!(shown, vec!["3+3", "2+2", "1+1"]);
            assert_eq!(ledger.latest().map(|e| e.result.as_str()), Some("6"));
        }

        #[test]
        fn test_ids_unique_and_lookup() {
            let mut ledger = Ledger::new();
            let first = ledger.append("1", "1").id;
            let second = ledger.append("2", "2").id;
            assert_ne!(first, second);
            assert_eq!(ledger.get(second).map(|e| e.expression.as_str()), Some("2"));
        }

        #[test]
        fn test_timestamps_non_decreasing() {
            let mut ledger = Ledger::new();
            ledger.append("1", "1");
            ledger.append("2", "2");
            let entries = ledger.entries();
            assert!(entries[0].timestamp <= entries[1].timestamp);
        }

        #[test]
        fn test_clear() {
            let mut ledger = Ledger::new();
            ledger.append("1", "1");
            ledger.clear();
            assert!(ledger.is_empty());
            assert_eq!(ledger.len(), 0);
        }

        #[test]
        fn test_entry_serializes() {
            let entry = HistoryEntry::new("2+2", "4");
            let json = serde_json::to_value(&entry).unwrap();
            assert_eq!(json["expression"], "2+2");
            assert_eq!(json["result"], "4");
            assert!(json["id"].is_string());
        }
    }

    mod calculator_tests {
        use super::*;

        fn typed(calc: &mut Calculator, keys: &[&str]) {
            for key in keys {
                calc.input(key);
            }
        }

        #[test]
        fn test_keypad_flow() {
            let mut calc = Calculator::default();
            typed(&mut calc, &["sin(", "9", "0", ")"]);
            assert_eq!(calc.expression(), "sin(90)");
            calc.calculate();
            assert_eq!(calc.session().result.as_deref(), Some("1"));
        }

        #[test]
        fn test_ans_key_inserts_last_result() {
            let mut calc = Calculator::default();
            typed(&mut calc, &["6", "*", "7"]);
            calc.calculate();
            calc.clear();
            typed(&mut calc, &["ans", "+", "1"]);
            assert_eq!(calc.expression(), "42+1");
        }

        #[test]
        fn test_ans_before_any_result_inserts_nothing() {
            let mut calc = Calculator::default();
            calc.input("ans");
            assert_eq!(calc.expression(), "");
        }

        #[test]
        fn test_typed_line_expands_ans() {
            let mut calc = Calculator::default();
            calc.evaluate_line("-3");
            calc.evaluate_line("ans^2 + answer_free");
            // answer_free is not `ans`: still an unknown identifier
            assert_eq!(calc.session().error.as_deref(), Some("Syntax Error"));
            calc.evaluate_line("ans^2");
            assert_eq!(calc.session().result.as_deref(), Some("9"));
            assert_eq!(calc.session().history.latest().map(|e| e.expression.as_str()), Some("(-3)^2"));
        }

        #[test]
        fn test_delete_and_clear() {
            let mut calc = Calculator::default();
            typed(&mut calc, &["1", "2", "3"]);
            calc.delete();
            assert_eq!(calc.expression(), "12");
            calc.calculate();
            calc.clear();
            assert_eq!(calc.expression(), "");
            assert_eq!(calc.session().result, None);
            assert_eq!(calc.session().last_result.as_deref(), Some("12"));
            assert_eq!(calc.session().history.len(), 1);
        }

        #[test]
        fn test_toggle_mode() {
            let mut calc = Calculator::default();
            assert_eq!(calc.mode(), AngleMode::Deg);
            assert_eq!(calc.toggle_mode(), AngleMode::Rad);
            calc.set_expression("sin(90)");
            calc.calculate();
            assert_eq!(calc.session().result.as_deref(), Some("0.89399666360056"));
        }

        #[test]
        fn test_select_history_restores() {
            let mut calc = Calculator::default();
            calc.evaluate_line("2+2");
            calc.evaluate_line("3+3");
            let id = calc.session().history.entries()[0].id;
            calc.evaluate_line("2+");
            assert!(calc.select_history(id));
            assert_eq!(calc.expression(), "2+2");
            assert_eq!(calc.session().result.as_deref(), Some("4"));
            assert_eq!(calc.session().error, None);
            assert!(!calc.select_history(uuid::Uuid::new_v4()));
        }

        #[test]
        fn test_clear_history() {
            let mut calc = Calculator::default();
            calc.evaluate_line("1+1");
            calc.clear_history();
            assert!(calc.session().history.is_empty());
            assert_eq!(calc.session().last_result.as_deref(), Some("2"));
        }

        #[test]
        fn test_plot_state_transitions() {
            let mut calc = Calculator::default();
            calc.set_expression("x^2");
            assert_eq!(calc.plot().points.len(), 41);
            assert_eq!(calc.plot_state().message, None);

            calc.set_expression("sqrt(-1 - x^2)");
            let state = calc.plot();
            assert_eq!(state.points.len(), 41, "previous points retained");
            assert_eq!(state.message.as_deref(), Some(NO_VALID_POINTS_MESSAGE));

            calc.set_expression("x +");
            let state = calc.plot();
            assert!(state.points.is_empty());
            assert_eq!(state.message.as_deref(), Some(COMPILE_FAILED_MESSAGE));

            calc.set_expression("x");
            calc.plot();
            calc.set_expression("5+3");
            let state = calc.plot();
            assert!(state.points.is_empty());
            assert_eq!(state.message.as_deref(), Some(PROMPT_MESSAGE));
        }

        #[test]
        fn test_explanation_request_needs_result() {
            let mut calc = Calculator::default();
            assert_eq!(calc.explanation_request(), None);
            calc.evaluate_line("sqrt(16)");
            assert_eq!(
                calc.explanation_request(),
                Some(ExplanationRequest {
                    expression: "sqrt(16)".to_string(),
                    result: "4".to_string(),
                })
            );
        }
    }
}
