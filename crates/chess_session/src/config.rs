//! Session configuration
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! search_depth = 4
//! personality = "aggressive"
//! provider_timeout_ms = 2000
//! opening = ["e2e4", "e7e5"]
//!
//! [opponent]
//! mode = "computer"
//! plays = "Black"
//! ```

use std::path::Path;
use std::time::Duration;

use chess_rules::Color;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Deepest search a provider may be asked for.
pub const MAX_SEARCH_DEPTH: u8 = 8;

/// Playing style passed through to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Standard,
    Aggressive,
    Defensive,
}

/// Who plays against the human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Opponent {
    /// Both sides are entered by hand.
    #[default]
    Human,
    Computer { plays: Color },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub opponent: Opponent,
    pub search_depth: u8,
    pub personality: Personality,
    /// Deadline for one provider answer (None = wait forever)
    pub provider_timeout_ms: Option<u64>,
    /// Extra attempts after a provider answer is rejected
    pub provider_retries: u32,
    /// Move text applied in order when a game starts
    pub opening: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opponent: Opponent::Human,
            search_depth: 3,
            personality: Personality::Standard,
            provider_timeout_ms: Some(5_000),
            provider_retries: 2,
            opening: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// A config with the computer playing `color` and defaults elsewhere.
    pub fn against_computer(color: Color) -> Self {
        Self {
            opponent: Opponent::Computer { plays: color },
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> SessionResult<Self> {
        let config: SessionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> SessionResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> SessionResult<()> {
        if !(1..=MAX_SEARCH_DEPTH).contains(&self.search_depth) {
            return Err(SessionError::Config(format!(
                "search_depth must be between 1 and {MAX_SEARCH_DEPTH}, got {}",
                self.search_depth
            )));
        }
        if self.provider_timeout_ms == Some(0) {
            return Err(SessionError::Config(
                "provider_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_ms.map(Duration::from_millis)
    }

    /// Color played by the computer, if any.
    pub fn computer_color(&self) -> Option<Color> {
        match self.opponent {
            Opponent::Human => None,
            Opponent::Computer { plays } => Some(plays),
        }
    }

    /// Total number of times a provider is asked before giving up.
    pub fn provider_attempts(&self) -> u32 {
        self.provider_retries.saturating_add(1)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
