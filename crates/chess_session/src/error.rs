//! Errors raised while driving a session.

use std::time::Duration;

use chess_rules::RulesError;
use thiserror::Error;

/// Why a provider's answer could not be used.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider returned no move")]
    Empty,

    #[error("provider returned unreadable move {0:?}")]
    Malformed(String),

    #[error("provider move {text:?} was rejected: {source}")]
    Illegal { text: String, source: RulesError },

    /// The answer arrived after the deadline and was discarded.
    #[error("provider answered after {elapsed:?}, past its deadline")]
    Timeout { elapsed: Duration },

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("provider gave no usable move in {attempts} attempts")]
    Stalled { attempts: u32 },

    #[error("the side to move is not played by the computer")]
    NotComputerTurn,

    #[error("the side to move is played by the computer")]
    ComputerToMove,

    #[error("no move provider attached to the session")]
    NoProvider,

    /// An opening token failed; tokens before `index` stay applied.
    #[error("opening move {index} ({token:?}) failed: {source}")]
    Opening {
        index: usize,
        token: String,
        source: RulesError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
