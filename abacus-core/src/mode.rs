//! Angle mode for trigonometric input

use crate::AbacusError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How bare trig arguments are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    #[serde(alias = "degrees")]
    Deg,
    #[serde(alias = "radians")]
    Rad,
}

impl AngleMode {
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Deg => AngleMode::Rad,
            AngleMode::Rad => AngleMode::Deg,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Deg => "DEG",
            AngleMode::Rad => "RAD",
        }
    }
}

impl std::fmt::Display for AngleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AngleMode {
    type Err = AbacusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleMode::Deg),
            "rad" | "radian" | "radians" => Ok(AngleMode::Rad),
            other => Err(AbacusError::invalid_mode(other)),
        }
    }
}
