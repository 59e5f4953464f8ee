//! Engine configuration
//!
//! Board shape, alphabet size, move budget and seed. Values come from
//! [`EngineConfig::default`], the `MATCH3_*` environment variables, or are
//! set directly by the embedding program.

use thiserror::Error;

use crate::types::{Symbol, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_MOVES, MAX_GRID_DIM};

/// Smallest usable alphabet
pub const MIN_SYMBOLS: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid dimensions {width}x{height} outside 1..={}", MAX_GRID_DIM)]
    InvalidDimensions { width: u8, height: u8 },
    #[error("symbol count {0} outside {}..={}", MIN_SYMBOLS, Symbol::COUNT)]
    InvalidSymbolCount(u8),
    #[error("{var}={value:?} is not a valid number")]
    InvalidEnv { var: &'static str, value: String },
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    /// Number of symbols in play (first N of `Symbol::ALL`)
    pub symbol_count: u8,
    /// Moves granted by `new_game`
    pub initial_moves: u32,
    pub seed: u32,
    /// Keep input locked after a turn until `Session::presentation_settled`
    pub hold_input_for_presentation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            symbol_count: Symbol::COUNT as u8,
            initial_moves: DEFAULT_MOVES,
            seed: 1,
            hold_input_for_presentation: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `MATCH3_WIDTH`, `MATCH3_HEIGHT`,
    /// `MATCH3_SYMBOLS`, `MATCH3_MOVES` and `MATCH3_SEED`.
    ///
    /// Unset or blank variables keep the default; unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "MATCH3_WIDTH")? {
            config.width = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_HEIGHT")? {
            config.height = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_SYMBOLS")? {
            config.symbol_count = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_MOVES")? {
            config.initial_moves = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_SEED")? {
            config.seed = v;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim_ok = |d: u8| (1..=MAX_GRID_DIM).contains(&d);
        if !dim_ok(self.width) || !dim_ok(self.height) {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(MIN_SYMBOLS..=Symbol::COUNT as u8).contains(&self.symbol_count) {
            return Err(ConfigError::InvalidSymbolCount(self.symbol_count));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| ConfigError::InvalidEnv {
        var,
        value: raw.clone(),
    })
}
