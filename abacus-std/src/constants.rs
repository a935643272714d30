//! Mathematical constants

use abacus_core::Number;
use abacus_plugin::ConstantDef;

pub fn pi() -> ConstantDef {
    ConstantDef::new("π", "Ratio of a circle's circumference to its diameter", Number::pi)
}

/// ASCII alias for π
pub fn pi_ascii() -> ConstantDef {
    ConstantDef::new("pi", "Ratio of a circle's circumference to its diameter", Number::pi)
}

pub fn e() -> ConstantDef {
    ConstantDef::new("e", "Euler's number, base of the natural logarithm", Number::e)
}
