//! A game together with the configuration and provider that drive it.
//!
//! Human moves, opening-book moves and provider moves all go through the same
//! path: parse the move text against the current position, then
//! [`GameState::apply_move`], then [`GameState::promote_pawn`] when the move
//! lands a pawn on its last rank.

use std::path::Path;

use chess_rules::{
    is_promotion_move, parse_move_text, GameState, MoveRecord, Outcome, Phase, PieceKind,
    RulesError, RulesResult, Square,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{ProviderError, SessionError, SessionResult};
use crate::provider::{MoveProvider, SearchRequest};
use crate::time_control::TimeControl;

/// Saved form of a finished or interrupted game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryExport {
    pub moves: Vec<MoveRecord>,
    pub outcome: Outcome,
    /// Position key after the last move
    pub final_key: String,
}

pub struct Session {
    config: SessionConfig,
    game: GameState,
    provider: Option<Box<dyn MoveProvider>>,
}

impl Session {
    /// Start a game from the initial position and play the configured opening.
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        let mut session = Session {
            config,
            game: GameState::new(),
            provider: None,
        };
        session.play_configured_opening()?;
        info!(opponent = ?session.config.opponent, "session started");
        Ok(session)
    }

    pub fn with_provider(
        config: SessionConfig,
        provider: Box<dyn MoveProvider>,
    ) -> SessionResult<Self> {
        let mut session = Self::new(config)?;
        session.set_provider(provider);
        Ok(session)
    }

    /// Continue an existing game. The configured opening is not applied.
    pub fn from_game(config: SessionConfig, game: GameState) -> SessionResult<Self> {
        config.validate()?;
        Ok(Session {
            config,
            game,
            provider: None,
        })
    }

    pub fn set_provider(&mut self, mut provider: Box<dyn MoveProvider>) {
        provider.new_game();
        debug!(provider = provider.name(), "provider attached");
        self.provider = Some(provider);
    }

    /// Throw the current game away and start over, opening included.
    pub fn new_game(&mut self) -> SessionResult<()> {
        self.game = GameState::new();
        if let Some(provider) = self.provider.as_deref_mut() {
            provider.new_game();
        }
        self.play_configured_opening()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn outcome(&self) -> Outcome {
        self.game.outcome()
    }

    pub fn legal_moves(&self, sq: Square) -> SessionResult<Vec<Square>> {
        Ok(self.game.legal_moves(sq)?)
    }

    fn play_configured_opening(&mut self) -> SessionResult<()> {
        if self.config.opening.is_empty() {
            return Ok(());
        }
        let tokens = self.config.opening.clone();
        let applied = self.apply_opening(&tokens)?;
        debug!(moves = applied, "opening applied");
        Ok(())
    }

    /// Apply book moves in order. Stops at the first token that does not
    /// parse or is not legal; the moves before it stay on the board.
    /// Pawns reaching the last rank without a letter become queens.
    pub fn apply_opening<S: AsRef<str>>(&mut self, tokens: &[S]) -> SessionResult<usize> {
        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            apply_text(&mut self.game, token, Some(PieceKind::Queen)).map_err(|source| {
                warn!(index, token, error = %source, "opening stopped");
                SessionError::Opening {
                    index,
                    token: token.to_string(),
                    source,
                }
            })?;
        }
        Ok(tokens.len())
    }

    /// Play a move entered by a human. A promotion letter completes the
    /// promotion right away; without one the game waits for [`Session::promote`].
    /// Refused while the computer's side is to move.
    pub fn play_move(&mut self, text: &str) -> SessionResult<MoveRecord> {
        if self.is_computer_turn() {
            return Err(SessionError::ComputerToMove);
        }
        Ok(apply_text(&mut self.game, text, None)?)
    }

    pub fn promote(&mut self, kind: PieceKind) -> SessionResult<MoveRecord> {
        Ok(self.game.promote_pawn(kind)?)
    }

    /// Is the side to move played by the computer, with a move to make?
    pub fn is_computer_turn(&self) -> bool {
        self.config.computer_color() == Some(self.game.turn())
            && matches!(
                self.game.phase(),
                Phase::AwaitingSelection | Phase::PieceSelected(_)
            )
    }

    /// Ask the provider for a move and play it.
    ///
    /// Answers that are empty, unreadable, illegal or late are logged and the
    /// provider is asked again, up to the configured number of attempts.
    pub fn play_computer_turn(&mut self) -> SessionResult<MoveRecord> {
        if let Phase::GameOver(outcome) = self.game.phase() {
            return Err(RulesError::GameOver(outcome).into());
        }
        if !self.is_computer_turn() {
            return Err(SessionError::NotComputerTurn);
        }

        let Session {
            config,
            game,
            provider,
        } = self;
        let provider = provider.as_deref_mut().ok_or(SessionError::NoProvider)?;

        let attempts = config.provider_attempts();
        for attempt in 1..=attempts {
            let request = search_request(config, game);
            match ask_provider(provider, game, &request) {
                Ok(record) => {
                    debug!(
                        provider = provider.name(),
                        mv = %record.notation,
                        attempt,
                        "computer move applied"
                    );
                    return Ok(record);
                }
                Err(err) => {
                    warn!(provider = provider.name(), attempt, error = %err, "provider answer rejected");
                }
            }
        }
        Err(SessionError::Stalled { attempts })
    }

    /// Moves so far in coordinate notation, space-separated.
    pub fn history_text(&self) -> String {
        history_text(&self.game)
    }

    pub fn history_export(&self) -> HistoryExport {
        HistoryExport {
            moves: self.game.move_history().to_vec(),
            outcome: self.game.outcome(),
            final_key: self.game.position_key(),
        }
    }

    /// Save the move history to a JSON file
    pub fn save_history_json(&self, path: &Path) -> SessionResult<()> {
        let json = serde_json::to_string_pretty(&self.history_export())?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), moves = self.game.move_history().len(), "history saved");
        Ok(())
    }

    /// Load a history previously written by [`Session::save_history_json`]
    pub fn load_history_json(path: &Path) -> SessionResult<HistoryExport> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn history_text(game: &GameState) -> String {
    game.move_history()
        .iter()
        .map(MoveRecord::coordinate)
        .collect::<Vec<_>>()
        .join(" ")
}

fn search_request(config: &SessionConfig, game: &GameState) -> SearchRequest {
    SearchRequest {
        history: history_text(game),
        depth: config.search_depth,
        color: game.turn(),
        personality: config.personality,
        position_key: game.position_key(),
        position: game.position().clone(),
        time_control: TimeControl::new(config.provider_timeout()),
    }
}

/// Parse `text`, play it and settle any promotion with the move's own
/// letter or `default_promotion`.
fn apply_text(
    game: &mut GameState,
    text: &str,
    default_promotion: Option<PieceKind>,
) -> RulesResult<MoveRecord> {
    let parsed = parse_move_text(game.position(), text)?;
    if parsed.promotion.is_some() && !is_promotion_move(game.position(), parsed.from, parsed.to) {
        return Err(RulesError::InvalidMoveText(text.to_string()));
    }
    let record = game.apply_move(parsed.from, parsed.to)?;
    if let Phase::AwaitingPromotion(_) = game.phase() {
        if let Some(kind) = parsed.promotion.or(default_promotion) {
            return game.promote_pawn(kind);
        }
    }
    Ok(record)
}

fn ask_provider(
    provider: &mut dyn MoveProvider,
    game: &mut GameState,
    request: &SearchRequest,
) -> Result<MoveRecord, ProviderError> {
    request.time_control.start();
    let answer = provider.best_move(request)?;
    if request.time_control.check_time() {
        return Err(ProviderError::Timeout {
            elapsed: request.time_control.elapsed(),
        });
    }

    let text = answer.trim();
    if text.is_empty() {
        return Err(ProviderError::Empty);
    }
    let parsed = parse_move_text(game.position(), text)
        .map_err(|_| ProviderError::Malformed(text.to_string()))?;
    if parsed.promotion.is_some() && !is_promotion_move(game.position(), parsed.from, parsed.to) {
        return Err(ProviderError::Malformed(text.to_string()));
    }

    let illegal = |source: RulesError| ProviderError::Illegal {
        text: text.to_string(),
        source,
    };
    let record = game.apply_move(parsed.from, parsed.to).map_err(illegal)?;
    if let Phase::AwaitingPromotion(_) = game.phase() {
        let kind = parsed.promotion.unwrap_or(PieceKind::Queen);
        return game.promote_pawn(kind).map_err(illegal);
    }
    Ok(record)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
