//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `$ABACUS_CONFIG` environment variable
//! 3. `~/.config/abacus/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use abacus::NormalizeStrategy;
use abacus_assist::GeminiConfig;
use abacus_core::{AngleMode, MAX_PRECISION, WORKING_PRECISION};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calculator: CalculatorConfig,
    pub assistant: GeminiConfig,
}

/// Evaluation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Startup angle mode: "deg" or "rad".
    pub mode: AngleMode,
    /// Significant digits carried during evaluation.
    pub working_precision: u32,
    /// Significant digits shown in results.
    pub display_precision: u32,
    /// Degree-mode rewrite: "syntax" or "textual".
    pub normalization: NormalizeStrategy,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            mode: AngleMode::Deg,
            working_precision: WORKING_PRECISION,
            display_precision: 14,
            normalization: NormalizeStrategy::Syntax,
        }
    }
}

impl Config {
    fn validate(self) -> Result<Self> {
        let calc = &self.calculator;
        if !(16..=MAX_PRECISION).contains(&calc.working_precision) {
            bail!(
                "working_precision must be between 16 and {}, got {}",
                MAX_PRECISION,
                calc.working_precision
            );
        }
        if calc.display_precision == 0 || calc.display_precision > calc.working_precision {
            bail!(
                "display_precision must be between 1 and working_precision ({}), got {}",
                calc.working_precision,
                calc.display_precision
            );
        }
        Ok(self)
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }

    if let Some(p) = config_path() {
        if p.exists() {
            return read_config(&p);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_config(&content).with_context(|| format!("parsing {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.validate()
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("ABACUS_CONFIG") {
        return Some(PathBuf::from(p));
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("abacus").join("config.toml"))
}

/// Show the active config path (for `abacus config`).
pub fn show_config_path(explicit: Option<&Path>) -> String {
    if let Some(p) = explicit {
        return format!("{} (from --config)", p.display());
    }
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
