//! Abstract Syntax Tree

use abacus_core::Number;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    Variable(String),
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),
    UnaryOp(UnaryOp, Box<Expr>),
    FunctionCall(String, Vec<Expr>),
    /// Value tagged with an angle unit: `90 deg`, `(x) rad`
    Angle(Box<Expr>, AngleUnit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp { Add, Sub, Mul, Div, Pow }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp { Neg, Plus }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit { Deg, Rad }

impl Expr {
    /// Identifiers used as values (not as function names), sorted
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.walk(&mut |e| {
            if let Expr::Variable(name) = e {
                names.insert(name.clone());
            }
        });
        names
    }

    /// Every function call in the tree with its argument count
    pub fn function_calls(&self) -> Vec<(String, usize)> {
        let mut calls = Vec::new();
        self.walk(&mut |e| {
            if let Expr::FunctionCall(name, args) = e {
                calls.push((name.clone(), args.len()));
            }
        });
        calls
    }

    /// Pre-order traversal
    pub fn walk(&self, visit: &mut impl FnMut(&Expr)) {
        visit(self);
        match self {
            Expr::Number(_) | Expr::Variable(_) => {}
            Expr::BinaryOp(left, _, right) => {
                left.walk(visit);
                right.walk(visit);
            }
            Expr::UnaryOp(_, inner) | Expr::Angle(inner, _) => inner.walk(visit),
            Expr::FunctionCall(_, args) => {
                for arg in args {
                    arg.walk(visit);
                }
            }
        }
    }
}
