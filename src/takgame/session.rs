use super::candidates::MoveCandidates;
use super::history::MoveHistory;
use crate::core::dispatcher::RequestId;
use crate::core::entities::{GameResult, GameSetup, GameState, PlayerAssignment, PlayerColor, PlayerType};
use crate::core::errors::{AppError, AppErrorKind};
use crate::core::moves::{Move, MoveQuery};
use crate::core::server::{ServerReply, ServerRequest};
use log::{debug, info, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingGameTypeSubmission,
    AwaitingHumanMove(PlayerColor),
    AwaitingComputerMove(PlayerColor),
    GameOver(GameResult),
}

/// A request the session wants sent; its reply must come back with the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub id: RequestId,
    pub request: ServerRequest,
}

#[derive(Debug, Clone)]
struct Pending {
    id: RequestId,
    request: ServerRequest,
    submitted: Option<Move>,
}

/// Drives one game against the server.
///
/// The session never talks to the network itself: operations hand back an
/// [`Outgoing`] request and the caller feeds the outcome to [`Session::handle_reply`].
/// Only one request may be pending at a time, and a reply carrying any other
/// id is dropped without touching the session.
pub struct Session {
    state: SessionState,
    players: Option<PlayerAssignment>,
    snapshot: Option<GameState>,
    candidates: MoveCandidates,
    history: MoveHistory,
    hint: Option<Move>,
    last_error: Option<AppError>,
    pending: Option<Pending>,
    next_request_id: RequestId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            state: SessionState::AwaitingGameTypeSubmission,
            players: None,
            snapshot: None,
            candidates: MoveCandidates::default(),
            history: MoveHistory::default(),
            hint: None,
            last_error: None,
            pending: None,
            next_request_id: 1,
        }
    }

    /// Discards the finished game. Request ids keep counting so nothing from
    /// the old game can be mistaken for a reply to the new one.
    pub fn reset(&mut self) -> Result<(), AppError> {
        if !matches!(self.state, SessionState::GameOver(_)) {
            return self.fail(AppError::invalid_state("the game is still running"));
        }

        let next_request_id = self.next_request_id;

        *self = Session::new();
        self.next_request_id = next_request_id;

        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&GameState> {
        self.snapshot.as_ref()
    }

    pub fn candidates(&self) -> &MoveCandidates {
        &self.candidates
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn hint(&self) -> Option<&Move> {
        self.hint.as_ref()
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn player_type(&self, color: PlayerColor) -> Option<PlayerType> {
        self.players.map(|players| players.get(color))
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Records an error raised outside the session, e.g. an unparsable form field.
    pub fn report_error(&mut self, err: AppError) {
        warn!("{}", &err);
        self.last_error = Some(err);
    }

    pub fn start_game(&mut self, setup: GameSetup) -> Result<Outgoing, AppError> {
        if self.state != SessionState::AwaitingGameTypeSubmission {
            return self.fail(AppError::invalid_state("a game is already running"));
        }

        let outgoing = self.issue(ServerRequest::StartGame(setup), None)?;

        self.players = Some(setup.players());

        info!(
            "starting {}x{} game, white: {}, black: {}",
            setup.size,
            setup.size,
            setup.white_type.name(),
            setup.black_type.name()
        );

        Ok(outgoing)
    }

    pub fn submit_move(&mut self, query: &MoveQuery) -> Result<Outgoing, AppError> {
        if !matches!(self.state, SessionState::AwaitingHumanMove(_)) {
            return self.fail(AppError::invalid_state("it is not a human player's turn"));
        }

        if self.candidates.is_empty() {
            return self.fail(AppError::invalid_state("legal moves are not loaded yet"));
        }

        let move_idx = match self.candidates.find(query) {
            Some(idx) => idx,
            None => {
                return self.fail(AppError::new(
                    AppErrorKind::NoMatchingMove,
                    format!("no legal {} matches the entered parameters", query.move_type),
                ))
            }
        };

        let submitted = self.candidates.get(move_idx).cloned();
        let outgoing = self.issue(ServerRequest::MakeMove { move_idx }, submitted)?;

        self.candidates.clear();
        self.hint = None;

        Ok(outgoing)
    }

    pub fn request_hint(&mut self) -> Result<Outgoing, AppError> {
        if !matches!(self.state, SessionState::AwaitingHumanMove(_)) {
            return self.fail(AppError::invalid_state("hints are only given on your turn"));
        }

        self.issue(ServerRequest::GetMoveHint, None)
    }

    /// Asks again for whatever the current turn is waiting on after a failed request.
    pub fn retry(&mut self) -> Result<Outgoing, AppError> {
        let request = match self.state {
            SessionState::AwaitingHumanMove(_) if self.candidates.is_empty() => {
                ServerRequest::GetPossibleMoves
            }
            SessionState::AwaitingComputerMove(_) => ServerRequest::GetComputerMove,
            _ => return self.fail(AppError::invalid_state("nothing to retry")),
        };

        self.issue(request, None)
    }

    /// Applies the outcome of request `id`, returning the follow-up request if any.
    pub fn handle_reply(
        &mut self,
        id: RequestId,
        result: Result<ServerReply, AppError>,
    ) -> Option<Outgoing> {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                warn!("discarding stale reply to request {}", id);
                self.pending = other;
                return None;
            }
        };

        debug!(
            "reply to request {} ('{}')",
            id,
            pending.request.endpoint()
        );

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!("request '{}' failed: {}", pending.request.endpoint(), &err);
                self.last_error = Some(err);
                return None;
            }
        };

        self.last_error = None;

        match (self.state, reply) {
            (SessionState::AwaitingGameTypeSubmission, ServerReply::GameStarted(state)) => {
                self.snapshot = Some(state);
                self.next_turn()
            }
            (SessionState::AwaitingHumanMove(_), ServerReply::PossibleMoves(moves)) => {
                debug!("{} legal moves", moves.len());
                self.candidates = MoveCandidates::new(moves);
                None
            }
            (SessionState::AwaitingHumanMove(_), ServerReply::Hint(mv)) => {
                self.hint = Some(mv);
                None
            }
            (SessionState::AwaitingHumanMove(_), ServerReply::MoveApplied { state, result }) => {
                if let Some(mv) = &pending.submitted {
                    self.history.push(mv);
                }

                self.apply_outcome(state, result)
            }
            (
                SessionState::AwaitingComputerMove(_),
                ServerReply::ComputerMoved { mv, state, result },
            ) => {
                info!("computer played {}", mv.describe());
                self.history.push(&mv);
                self.apply_outcome(state, result)
            }
            (state, reply) => {
                let err = AppError::invalid_state(format!(
                    "unexpected reply {:?} while {:?}",
                    reply, state
                ));
                self.report_error(err);
                None
            }
        }
    }

    fn apply_outcome(&mut self, state: GameState, result: GameResult) -> Option<Outgoing> {
        self.snapshot = Some(state);

        if result.is_over() {
            info!("game over: {}", result.message());
            self.state = SessionState::GameOver(result);
            self.candidates.clear();
            self.hint = None;
            return None;
        }

        self.next_turn()
    }

    fn next_turn(&mut self) -> Option<Outgoing> {
        let color = self.snapshot.as_ref()?.current_player;
        let player_type = self.player_type(color)?;

        self.candidates.clear();
        self.hint = None;

        let request = match player_type {
            PlayerType::Human => {
                self.state = SessionState::AwaitingHumanMove(color);
                ServerRequest::GetPossibleMoves
            }
            PlayerType::Computer => {
                self.state = SessionState::AwaitingComputerMove(color);
                ServerRequest::GetComputerMove
            }
        };

        info!("{} to move ({})", color.name(), player_type.name());

        self.issue(request, None).ok()
    }

    fn issue(
        &mut self,
        request: ServerRequest,
        submitted: Option<Move>,
    ) -> Result<Outgoing, AppError> {
        if let Some(pending) = &self.pending {
            let err = AppError::new(
                AppErrorKind::RequestInFlight,
                format!("still waiting for '{}'", pending.request.endpoint()),
            );

            return self.fail(err);
        }

        let id = self.next_request_id;
        self.next_request_id += 1;

        self.pending = Some(Pending {
            id,
            request: request.clone(),
            submitted,
        });
        self.last_error = None;

        Ok(Outgoing { id, request })
    }

    fn fail<T>(&mut self, err: AppError) -> Result<T, AppError> {
        self.report_error(err.clone());

        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::{Direction, Position};
    use crate::core::moves::MoveType;

    fn state(current_player: i8) -> GameState {
        serde_json::from_str(&format!(
            r#"{{
                "board": [[[], [], [], [], []], [[], [], [], [], []], [[], [], [], [], []],
                          [[], [], [], [], []], [[], [], [], [], []]],
                "num_flats": {{"1": 21, "-1": 21}},
                "num_caps": {{"1": 1, "-1": 1}},
                "current_player": {}
            }}"#,
            current_player
        ))
        .unwrap()
    }

    fn setup(white_type: PlayerType, black_type: PlayerType) -> GameSetup {
        GameSetup {
            size: 5,
            white_type,
            black_type,
        }
    }

    fn five_candidates() -> Vec<Move> {
        (0..5)
            .map(|col| Move::PlaceFlat {
                pos: Position::from(0, col),
            })
            .collect()
    }

    fn place_flat(row: u8, col: u8) -> MoveQuery {
        MoveQuery {
            move_type: MoveType::PlaceFlat,
            pos: Some(Position::from(row, col)),
            direction: None,
            split: None,
        }
    }

    /// Human white against computer black, with white's legal moves loaded.
    fn human_to_move() -> Session {
        let mut session = Session::new();
        let start = session
            .start_game(setup(PlayerType::Human, PlayerType::Computer))
            .unwrap();
        let fetch = session
            .handle_reply(start.id, Ok(ServerReply::GameStarted(state(1))))
            .unwrap();

        session.handle_reply(fetch.id, Ok(ServerReply::PossibleMoves(five_candidates())));

        session
    }

    #[test]
    fn start_game_waits_for_white_human() {
        let mut session = Session::new();
        let start = session
            .start_game(setup(PlayerType::Human, PlayerType::Computer))
            .unwrap();

        assert_eq!(
            ServerRequest::StartGame(setup(PlayerType::Human, PlayerType::Computer)),
            start.request
        );

        let next = session
            .handle_reply(start.id, Ok(ServerReply::GameStarted(state(1))))
            .unwrap();

        assert_eq!(
            SessionState::AwaitingHumanMove(PlayerColor::White),
            session.state()
        );
        assert_eq!(ServerRequest::GetPossibleMoves, next.request);
        assert_eq!(Some(PlayerType::Computer), session.player_type(PlayerColor::Black));
    }

    #[test]
    fn computer_first_player_is_asked_for_its_move() {
        let mut session = Session::new();
        let start = session
            .start_game(setup(PlayerType::Computer, PlayerType::Human))
            .unwrap();
        let next = session
            .handle_reply(start.id, Ok(ServerReply::GameStarted(state(1))))
            .unwrap();

        assert_eq!(
            SessionState::AwaitingComputerMove(PlayerColor::White),
            session.state()
        );
        assert_eq!(ServerRequest::GetComputerMove, next.request);
    }

    #[test]
    fn human_move_hands_over_to_the_computer() {
        let mut session = human_to_move();

        assert_eq!(5, session.candidates().len());

        let submit = session.submit_move(&place_flat(0, 2)).unwrap();

        assert_eq!(ServerRequest::MakeMove { move_idx: 2 }, submit.request);
        assert!(session.candidates().is_empty());
        assert!(session.history().lines().is_empty());

        let next = session
            .handle_reply(
                submit.id,
                Ok(ServerReply::MoveApplied {
                    state: state(-1),
                    result: GameResult::InProgress,
                }),
            )
            .unwrap();

        assert_eq!(
            SessionState::AwaitingComputerMove(PlayerColor::Black),
            session.state()
        );
        assert_eq!(ServerRequest::GetComputerMove, next.request);
        assert_eq!(&["1. PlaceFlat - (1,3)".to_string()], session.history().lines());
    }

    #[test]
    fn computer_move_is_logged_and_turn_returns() {
        let mut session = human_to_move();
        let submit = session.submit_move(&place_flat(0, 0)).unwrap();
        let computer = session
            .handle_reply(
                submit.id,
                Ok(ServerReply::MoveApplied {
                    state: state(-1),
                    result: GameResult::InProgress,
                }),
            )
            .unwrap();

        let next = session
            .handle_reply(
                computer.id,
                Ok(ServerReply::ComputerMoved {
                    mv: Move::MovePiece {
                        pos: Position::from(0, 0),
                        direction: Direction::Down,
                    },
                    state: state(1),
                    result: GameResult::InProgress,
                }),
            )
            .unwrap();

        assert_eq!(
            SessionState::AwaitingHumanMove(PlayerColor::White),
            session.state()
        );
        assert_eq!(ServerRequest::GetPossibleMoves, next.request);
        assert_eq!(
            &[
                "1. PlaceFlat - (1,1)".to_string(),
                "2. MovePiece - (1,1) - Down".to_string()
            ],
            session.history().lines()
        );
    }

    #[test]
    fn white_win_ends_the_game() {
        let mut session = human_to_move();
        let submit = session.submit_move(&place_flat(0, 4)).unwrap();

        let next = session.handle_reply(
            submit.id,
            Ok(ServerReply::MoveApplied {
                state: state(-1),
                result: GameResult::WhiteWin,
            }),
        );

        assert_eq!(None, next);
        assert_eq!(SessionState::GameOver(GameResult::WhiteWin), session.state());
        assert!(!session.is_busy());
        assert!(session.submit_move(&place_flat(0, 1)).is_err());
        assert!(session.request_hint().is_err());
        assert!(session.retry().is_err());

        session.reset().unwrap();
        assert_eq!(SessionState::AwaitingGameTypeSubmission, session.state());
        assert!(session.history().lines().is_empty());
    }

    #[test]
    fn unmatched_move_is_reported_and_nothing_is_sent() {
        let mut session = human_to_move();

        let err = session.submit_move(&place_flat(3, 3)).unwrap_err();

        assert_eq!(AppErrorKind::NoMatchingMove, err.kind);
        assert_eq!(Some(&err), session.last_error());
        assert!(!session.is_busy());
        assert_eq!(5, session.candidates().len());
    }

    #[test]
    fn second_request_while_pending_is_rejected() {
        let mut session = human_to_move();

        let hint = session.request_hint().unwrap();
        let err = session.submit_move(&place_flat(0, 0)).unwrap_err();

        assert_eq!(AppErrorKind::RequestInFlight, err.kind);
        assert_eq!(5, session.candidates().len());

        session.handle_reply(
            hint.id,
            Ok(ServerReply::Hint(Move::PlaceFlat {
                pos: Position::from(0, 3),
            })),
        );

        assert_eq!(
            Some(&Move::PlaceFlat {
                pos: Position::from(0, 3)
            }),
            session.hint()
        );
        assert!(session.submit_move(&place_flat(0, 0)).is_ok());
        assert_eq!(None, session.hint());
    }

    #[test]
    fn stale_replies_are_discarded() {
        let mut session = human_to_move();
        let submit = session.submit_move(&place_flat(0, 1)).unwrap();

        let stale = session.handle_reply(
            submit.id - 1,
            Ok(ServerReply::PossibleMoves(five_candidates())),
        );

        assert_eq!(None, stale);
        assert!(session.is_busy());
        assert!(session.candidates().is_empty());
        assert!(session.history().lines().is_empty());
    }

    #[test]
    fn failed_request_keeps_state_and_can_be_retried() {
        let mut session = Session::new();
        let start = session
            .start_game(setup(PlayerType::Human, PlayerType::Human))
            .unwrap();
        let fetch = session
            .handle_reply(start.id, Ok(ServerReply::GameStarted(state(1))))
            .unwrap();

        session.handle_reply(fetch.id, Err(AppError::transport("connection refused")));

        assert_eq!(
            SessionState::AwaitingHumanMove(PlayerColor::White),
            session.state()
        );
        assert_eq!(
            Some(AppErrorKind::Transport),
            session.last_error().map(|e| e.kind)
        );
        assert!(!session.is_busy());

        let retry = session.retry().unwrap();

        assert_eq!(ServerRequest::GetPossibleMoves, retry.request);
        assert_eq!(None, session.last_error());
    }

    #[test]
    fn failed_make_move_does_not_touch_history() {
        let mut session = human_to_move();
        let submit = session.submit_move(&place_flat(0, 1)).unwrap();

        session.handle_reply(
            submit.id,
            Err(AppError::malformed("'make_move' returned an unexpected body")),
        );

        assert!(session.history().lines().is_empty());
        assert_eq!(
            Some(AppErrorKind::MalformedResponse),
            session.last_error().map(|e| e.kind)
        );
    }

    #[test]
    fn game_cannot_be_started_twice() {
        let mut session = human_to_move();

        let err = session
            .start_game(setup(PlayerType::Human, PlayerType::Human))
            .unwrap_err();

        assert_eq!(AppErrorKind::InvalidState, err.kind);
        assert!(session.reset().is_err());
    }
}
