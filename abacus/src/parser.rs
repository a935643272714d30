//! Expression parser
//!
//! pest tokenizes against `grammar.pest`; a Pratt parser assigns operator
//! precedence. Lowest to highest:
//!
//! | operators            | associativity |
//! |----------------------|---------------|
//! | `+` `-`              | left          |
//! | `*` `/` juxtaposition| left          |
//! | unary `-` `+`        | prefix        |
//! | `^`                  | right         |
//! | `deg` `rad`          | postfix       |
//!
//! so `-2^2` is `-(2^2)` and `2^-1` is `2^(-1)`.

use crate::ast::{AngleUnit, BinOp, Expr, UnaryOp};
use abacus_core::{AbacusError, Number};
use pest::error::LineColLocation;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use std::sync::OnceLock;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct ExprParser;

fn pratt() -> &'static PrattParser<Rule> {
    static PRATT: OnceLock<PrattParser<Rule>> = OnceLock::new();
    PRATT.get_or_init(|| {
        PrattParser::new()
            .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
            .op(Op::infix(Rule::mul, Assoc::Left)
                | Op::infix(Rule::div, Assoc::Left)
                | Op::infix(Rule::implicit, Assoc::Left))
            .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
            .op(Op::infix(Rule::pow, Assoc::Right))
            .op(Op::postfix(Rule::deg) | Op::postfix(Rule::rad))
    })
}

/// Parse expression text to an AST
pub fn parse_expr(input: &str) -> Result<Expr, AbacusError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AbacusError::parse_error("Empty expression"));
    }

    let mut pairs = ExprParser::parse(Rule::formula, input).map_err(|e| {
        let column = match e.line_col {
            LineColLocation::Pos((_, col)) | LineColLocation::Span((_, col), _) => col,
        };
        AbacusError::parse_error(format!("{} at column {}", e.variant.message(), column))
            .with_formula(input)
    })?;

    match pairs.next() {
        Some(expr) => build_expr(expr.into_inner()),
        None => Err(AbacusError::parse_error("Empty expression")),
    }
}

fn build_expr(pairs: Pairs<Rule>) -> Result<Expr, AbacusError> {
    pratt()
        .map_primary(build_operand)
        .map_prefix(|op, rhs| {
            let unary = match op.as_rule() {
                Rule::neg => UnaryOp::Neg,
                _ => UnaryOp::Plus,
            };
            Ok(Expr::UnaryOp(unary, Box::new(rhs?)))
        })
        .map_postfix(|lhs, op| {
            let unit = match op.as_rule() {
                Rule::deg => AngleUnit::Deg,
                _ => AngleUnit::Rad,
            };
            Ok(Expr::Angle(Box::new(lhs?), unit))
        })
        .map_infix(|lhs, op, rhs| {
            let bin = match op.as_rule() {
                Rule::add => BinOp::Add,
                Rule::sub => BinOp::Sub,
                Rule::div => BinOp::Div,
                Rule::pow => BinOp::Pow,
                _ => BinOp::Mul,
            };
            Ok(Expr::BinaryOp(Box::new(lhs?), bin, Box::new(rhs?)))
        })
        .parse(pairs)
}

fn build_operand(pair: Pair<Rule>) -> Result<Expr, AbacusError> {
    match pair.as_rule() {
        Rule::number => {
            let text = pair.as_str();
            Number::from_literal(text)
                .map(Expr::Number)
                .map_err(|e| AbacusError::from(e).with_formula(text))
        }
        Rule::ident => Ok(Expr::Variable(pair.as_str().to_string())),
        Rule::call => {
            let mut inner = pair.into_inner();
            let name = inner
                .next()
                .map(|p| p.as_str().to_string())
                .ok_or_else(|| AbacusError::parse_error("Function call without a name"))?;
            let args = inner
                .map(|arg| build_expr(arg.into_inner()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::FunctionCall(name, args))
        }
        Rule::expr => build_expr(pair.into_inner()),
        other => Err(AbacusError::parse_error(format!("Unexpected token {:?}", other))),
    }
}
