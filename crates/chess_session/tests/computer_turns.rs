//! Computer turns against scripted providers that answer well, badly or late.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chess_rules::{sq, Color, GameState, Outcome, PieceKind, RulesError};
use chess_session::{
    MoveProvider, Personality, ProviderError, SearchRequest, Session, SessionConfig, SessionError,
};

enum Reply {
    Move(&'static str),
    Fail(ProviderError),
    /// Sleep past the deadline, then answer.
    Late(&'static str, Duration),
}

/// Plays back a fixed list of replies and records every request it sees.
struct ScriptedProvider {
    replies: VecDeque<Reply>,
    seen: Arc<Mutex<Vec<SearchRequest>>>,
    new_games: Arc<Mutex<u32>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Reply>) -> (Self, Arc<Mutex<Vec<SearchRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            replies: replies.into(),
            seen: Arc::clone(&seen),
            new_games: Arc::new(Mutex::new(0)),
        };
        (provider, seen)
    }
}

impl MoveProvider for ScriptedProvider {
    fn best_move(&mut self, request: &SearchRequest) -> Result<String, ProviderError> {
        self.seen.lock().unwrap().push(request.clone());
        match self.replies.pop_front() {
            Some(Reply::Move(mv)) => Ok(mv.to_string()),
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Late(mv, delay)) => {
                thread::sleep(delay);
                Ok(mv.to_string())
            }
            None => Err(ProviderError::Unavailable("script exhausted".into())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn new_game(&mut self) {
        *self.new_games.lock().unwrap() += 1;
    }
}

fn config(computer: Color, retries: u32) -> SessionConfig {
    SessionConfig {
        provider_retries: retries,
        provider_timeout_ms: Some(50),
        search_depth: 4,
        personality: Personality::Aggressive,
        ..SessionConfig::against_computer(computer)
    }
}

fn session(computer: Color, retries: u32, replies: Vec<Reply>) -> (Session, Arc<Mutex<Vec<SearchRequest>>>) {
    let (provider, seen) = ScriptedProvider::new(replies);
    let session = Session::with_provider(config(computer, retries), Box::new(provider)).unwrap();
    (session, seen)
}

#[test]
fn computer_reply_is_applied() {
    let (mut session, seen) = session(Color::Black, 0, vec![Reply::Move("e7e5")]);
    session.play_move("e2e4").unwrap();
    assert!(session.is_computer_turn());

    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.coordinate(), "e7e5");
    assert_eq!(session.history_text(), "e2e4 e7e5");
    assert!(!session.is_computer_turn());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let req = &seen[0];
    assert_eq!(req.history, "e2e4");
    assert_eq!(req.moves().collect::<Vec<_>>(), vec!["e2e4"]);
    assert_eq!(req.depth, 4);
    assert_eq!(req.color, Color::Black);
    assert_eq!(req.personality, Personality::Aggressive);
    assert_eq!(req.time_control.time_limit(), Some(Duration::from_millis(50)));
    assert!(req.position_key.contains(" b KQkq e3 0"));
}

#[test]
fn computer_can_open_as_white() {
    let (mut session, _) = session(Color::White, 0, vec![Reply::Move("d2d4")]);
    assert!(session.is_computer_turn());
    session.play_computer_turn().unwrap();
    assert_eq!(session.game().turn(), Color::Black);
}

#[test]
fn bad_answers_are_retried() {
    let replies = vec![
        Reply::Fail(ProviderError::Unavailable("warming up".into())),
        Reply::Move(""),
        Reply::Move("banana"),
        Reply::Move("e7e4"),
        Reply::Move("c7c5"),
    ];
    let (mut session, seen) = session(Color::Black, 4, replies);
    session.play_move("e2e4").unwrap();

    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.coordinate(), "c7c5");
    assert_eq!(seen.lock().unwrap().len(), 5);
    assert_eq!(session.game().move_history().len(), 2);
}

#[test]
fn provider_stalls_after_retries() {
    let replies = vec![
        Reply::Move("e7e4"),
        Reply::Move("xx"),
        Reply::Move("a1a1"),
        Reply::Move("e7e5"),
    ];
    let (mut session, seen) = session(Color::Black, 2, replies);
    session.play_move("e2e4").unwrap();
    let key = session.game().position_key();

    let err = session.play_computer_turn().unwrap_err();
    assert!(matches!(err, SessionError::Stalled { attempts: 3 }));
    assert_eq!(seen.lock().unwrap().len(), 3);
    // Nothing was played and it is still the computer's turn.
    assert_eq!(session.game().position_key(), key);
    assert!(session.is_computer_turn());

    // The next try gets the good answer.
    session.play_computer_turn().unwrap();
    assert_eq!(session.history_text(), "e2e4 e7e5");
}

#[test]
fn late_answer_is_discarded() {
    let replies = vec![
        Reply::Late("d7d5", Duration::from_millis(120)),
        Reply::Move("e7e5"),
    ];
    let (mut session, _) = session(Color::Black, 1, replies);
    session.play_move("e2e4").unwrap();

    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.coordinate(), "e7e5");
    assert!(session.game().board().piece_at(sq("d7")).is_some());
}

#[test]
fn late_answer_without_retries_stalls() {
    let replies = vec![Reply::Late("d7d5", Duration::from_millis(120))];
    let (mut session, _) = session(Color::Black, 0, replies);
    session.play_move("e2e4").unwrap();
    assert!(matches!(
        session.play_computer_turn(),
        Err(SessionError::Stalled { attempts: 1 })
    ));
    assert_eq!(session.history_text(), "e2e4");
}

fn promotion_session(replies: Vec<Reply>) -> Session {
    let (provider, _) = ScriptedProvider::new(replies);
    let game = GameState::from_fen("4k3/8/8/8/8/8/6p1/4K3 b - - 0 1").unwrap();
    let mut session = Session::from_game(config(Color::Black, 1), game).unwrap();
    session.set_provider(Box::new(provider));
    session
}

#[test]
fn provider_promotion_defaults_to_queen() {
    let mut session = promotion_session(vec![Reply::Move("g2g1")]);
    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.promotion, Some(PieceKind::Queen));
    assert!(
        session
            .game()
            .board()
            .piece_at(sq("g1"))
            .unwrap()
            .is(Color::Black, PieceKind::Queen)
    );
    assert_eq!(session.game().turn(), Color::White);
}

#[test]
fn provider_promotion_letter_is_honoured() {
    let mut session = promotion_session(vec![Reply::Move("g2g1n")]);
    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.notation, "g2g1n");
    assert_eq!(session.history_text(), "g2g1n");
}

#[test]
fn promotion_letter_on_ordinary_move_is_rejected() {
    let mut session = promotion_session(vec![Reply::Move("e8d8q"), Reply::Move("e8d7")]);
    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.coordinate(), "e8d7");
}

#[test]
fn provider_castles_with_notation() {
    let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    let mut session = Session::from_game(config(Color::Black, 0), game).unwrap();
    let (provider, _) = ScriptedProvider::new(vec![Reply::Move("O-O-O")]);
    session.set_provider(Box::new(provider));

    let rec = session.play_computer_turn().unwrap();
    assert_eq!(rec.notation, "O-O-O");
    assert!(
        session
            .game()
            .board()
            .piece_at(sq("d8"))
            .unwrap()
            .is(Color::Black, PieceKind::Rook)
    );
}

#[test]
fn no_computer_turn_after_game_over() {
    let replies = vec![Reply::Move("e7e5"), Reply::Move("d8h4"), Reply::Move("a7a6")];
    let (mut session, _) = session(Color::Black, 0, replies);
    session.play_move("f2f3").unwrap();
    session.play_computer_turn().unwrap();
    session.play_move("g2g4").unwrap();
    session.play_computer_turn().unwrap();
    assert_eq!(
        session.outcome(),
        Outcome::Checkmate {
            winner: Color::Black
        }
    );
    assert!(matches!(
        session.play_computer_turn(),
        Err(SessionError::Rules(RulesError::GameOver(_)))
    ));
}

#[test]
fn new_game_resets_provider() {
    let (provider, _) = ScriptedProvider::new(vec![]);
    let counter = Arc::clone(&provider.new_games);
    let mut session =
        Session::with_provider(SessionConfig::default(), Box::new(provider)).unwrap();
    assert_eq!(*counter.lock().unwrap(), 1);
    session.new_game().unwrap();
    assert_eq!(*counter.lock().unwrap(), 2);
}
