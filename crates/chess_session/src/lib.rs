//! Game session driver.
//!
//! Wraps a [`chess_rules::GameState`] with its [`SessionConfig`], feeds it
//! opening-book moves, and plays the computer's turns through a
//! [`MoveProvider`] under a deadline.

pub mod config;
pub mod error;
pub mod provider;
pub mod session;
pub mod time_control;

pub use config::{Opponent, Personality, SessionConfig, MAX_SEARCH_DEPTH};
pub use error::{ProviderError, SessionError, SessionResult};
pub use provider::{MoveProvider, SearchRequest};
pub use session::{HistoryExport, Session};
pub use time_control::TimeControl;
