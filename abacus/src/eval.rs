//! Expression evaluator
//!
//! Walks an AST against an `EvalContext`. Variables resolve through the
//! context (bindings, then registry constants); calls dispatch to the
//! registry. Any failure aborts the walk with a structured error.

use crate::ast::{AngleUnit, BinOp, Expr, UnaryOp};
use abacus_core::{AbacusError, Number};
use abacus_plugin::EvalContext;

/// Tree-walking evaluator
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate single expression
    pub fn eval_expr(&self, expr: &Expr, ctx: &EvalContext) -> Result<Number, AbacusError> {
        match expr {
            Expr::Number(n) => Ok(n.with_precision(ctx.precision)),

            Expr::Variable(name) => Ok(ctx.get_var(name)?.with_precision(ctx.precision)),

            Expr::BinaryOp(left, op, right) => {
                let l = self
                    .eval_expr(left, ctx)
                    .map_err(|e| e.with_note("from left operand"))?;
                let r = self
                    .eval_expr(right, ctx)
                    .map_err(|e| e.with_note("from right operand"))?;
                self.eval_binary_op(&l, *op, &r, ctx.precision)
            }

            Expr::UnaryOp(op, inner) => {
                let v = self.eval_expr(inner, ctx)?;
                Ok(self.eval_unary_op(*op, v))
            }

            Expr::FunctionCall(name, args) => {
                let evaluated_args = args
                    .iter()
                    .map(|a| self.eval_expr(a, ctx))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| e.with_note(format!("in argument of {}()", name)))?;

                ctx.call(name, &evaluated_args)
            }

            Expr::Angle(inner, unit) => {
                let v = self.eval_expr(inner, ctx)?;
                Ok(match unit {
                    AngleUnit::Deg => v.to_radians(ctx.precision),
                    AngleUnit::Rad => v,
                })
            }
        }
    }

    fn eval_binary_op(&self, l: &Number, op: BinOp, r: &Number, precision: u32) -> Result<Number, AbacusError> {
        match op {
            BinOp::Add => Ok(l.add(r)),
            BinOp::Sub => Ok(l.sub(r)),
            BinOp::Mul => Ok(l.checked_mul(r)?),
            BinOp::Div => Ok(l.checked_div(r)?),
            BinOp::Pow => l
                .pow_real(r, precision)
                .map_err(|e| AbacusError::from(e).with_note(format!("in {} ^ {}", l.to_sigfigs(14), r.to_sigfigs(14)))),
        }
    }

    fn eval_unary_op(&self, op: UnaryOp, value: Number) -> Number {
        match op {
            UnaryOp::Neg => value.neg(),
            UnaryOp::Plus => value,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
