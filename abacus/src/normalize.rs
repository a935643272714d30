//! Degree-mode normalization of trigonometric calls
//!
//! In degree mode the arguments of `sin`, `cos` and `tan` are tagged with
//! the `deg` unit before evaluation, so the radian-based functions receive
//! converted angles. Radian mode passes input through untouched.

use crate::ast::{AngleUnit, Expr};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const TRIG_FUNCTIONS: [&str; 3] = ["sin", "cos", "tan"];

/// How degree tagging is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeStrategy {
    /// Rewrite the parsed tree; nesting and existing unit tags are respected
    #[default]
    Syntax,
    /// Non-greedy text substitution `sin(A)` -> `sin((A) deg)`. The match
    /// stops at the first `)`, so a nested call can land inside its
    /// parent's tag.
    Textual,
}

fn trig_patterns() -> &'static [(Regex, String)] {
    static PATTERNS: OnceLock<Vec<(Regex, String)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TRIG_FUNCTIONS
            .iter()
            .filter_map(|name| {
                let re = Regex::new(&format!(r"{}\((.*?)\)", name)).ok()?;
                Some((re, format!("{}((${{1}}) deg)", name)))
            })
            .collect()
    })
}

/// Textual rewrite, applied per function in sin, cos, tan order
pub fn normalize_text(text: &str) -> String {
    trig_patterns()
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, replacement.as_str()).into_owned()
        })
}

/// Tree rewrite: every trig call's single argument becomes `Angle(arg, Deg)`
/// unless a unit already appears in its arithmetic (`-90 deg`, `2*45 deg`).
/// Recurses into all subtrees.
pub fn normalize_tree(expr: Expr) -> Expr {
    match expr {
        Expr::FunctionCall(name, args) => {
            let is_trig = TRIG_FUNCTIONS.iter().any(|t| t.eq_ignore_ascii_case(&name));
            let args = args
                .into_iter()
                .map(normalize_tree)
                .map(|arg| {
                    if is_trig && !carries_unit(&arg) {
                        Expr::Angle(Box::new(arg), AngleUnit::Deg)
                    } else {
                        arg
                    }
                })
                .collect();
            Expr::FunctionCall(name, args)
        }
        Expr::BinaryOp(left, op, right) => {
            Expr::BinaryOp(Box::new(normalize_tree(*left)), op, Box::new(normalize_tree(*right)))
        }
        Expr::UnaryOp(op, inner) => Expr::UnaryOp(op, Box::new(normalize_tree(*inner))),
        Expr::Angle(inner, unit) => Expr::Angle(Box::new(normalize_tree(*inner)), unit),
        leaf @ (Expr::Number(_) | Expr::Variable(_)) => leaf,
    }
}

/// True when a unit tag sits in the operator spine of `expr`. Units inside
/// nested calls belong to those calls.
fn carries_unit(expr: &Expr) -> bool {
    match expr {
        Expr::Angle(..) => true,
        Expr::BinaryOp(left, _, right) => carries_unit(left) || carries_unit(right),
        Expr::UnaryOp(_, inner) => carries_unit(inner),
        Expr::FunctionCall(..) | Expr::Number(_) | Expr::Variable(_) => false,
    }
}
