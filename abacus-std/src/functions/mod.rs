//! Standard math functions

mod math;
mod trig;

pub use math::{Sqrt, Ln, Log, Log10, Exp, Pow, Abs};
pub use trig::{Sin, Cos, Tan};
