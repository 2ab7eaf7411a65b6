use super::entities::{GameResult, GameSetup, GameState};
use super::errors::AppError;
use super::moves::Move;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ServerRequest {
    StartGame(GameSetup),
    GetPossibleMoves,
    MakeMove { move_idx: usize },
    GetComputerMove,
    GetMoveHint,
}

impl ServerRequest {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::StartGame(_) => "start_game",
            Self::GetPossibleMoves => "get_possible_moves",
            Self::MakeMove { .. } => "make_move",
            Self::GetComputerMove => "get_computer_move",
            Self::GetMoveHint => "get_move_hint",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Self::StartGame(setup) => json!({
                "size": setup.size,
                "white_type": setup.white_type,
                "black_type": setup.black_type,
            }),
            Self::MakeMove { move_idx } => json!({ "move_idx": move_idx }),
            _ => json!({}),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    GameStarted(GameState),
    PossibleMoves(Vec<Move>),
    MoveApplied {
        state: GameState,
        result: GameResult,
    },
    ComputerMoved {
        mv: Move,
        state: GameState,
        result: GameResult,
    },
    Hint(Move),
}

#[derive(Deserialize)]
struct StartGameBody {
    state: GameState,
}

#[derive(Deserialize)]
struct PossibleMovesBody {
    possible_moves: Vec<Move>,
}

#[derive(Deserialize)]
struct MoveAppliedBody {
    state: GameState,
    result: GameResult,
}

#[derive(Deserialize)]
struct ComputerMoveBody {
    #[serde(rename = "move")]
    mv: Move,
    state: GameState,
    result: GameResult,
}

impl ServerReply {
    /// Reads the body the server returned for `request`.
    pub fn parse(request: &ServerRequest, text: &str) -> Result<Self, AppError> {
        Ok(match request {
            ServerRequest::StartGame(_) => {
                Self::GameStarted(parse_body::<StartGameBody>(request, text)?.state)
            }
            ServerRequest::GetPossibleMoves => {
                Self::PossibleMoves(parse_body::<PossibleMovesBody>(request, text)?.possible_moves)
            }
            ServerRequest::MakeMove { .. } => {
                let body: MoveAppliedBody = parse_body(request, text)?;

                Self::MoveApplied {
                    state: body.state,
                    result: body.result,
                }
            }
            ServerRequest::GetComputerMove => {
                let body: ComputerMoveBody = parse_body(request, text)?;

                Self::ComputerMoved {
                    mv: body.mv,
                    state: body.state,
                    result: body.result,
                }
            }
            ServerRequest::GetMoveHint => Self::Hint(parse_body(request, text)?),
        })
    }
}

fn parse_body<T: DeserializeOwned>(request: &ServerRequest, text: &str) -> Result<T, AppError> {
    serde_json::from_str(text).map_err(|e| {
        let err_msg = format!("'{}' returned an unexpected body: {}", request.endpoint(), e);

        warn!("{}", &err_msg);

        AppError::malformed(err_msg)
    })
}

/// JSON-over-HTTP client for the game server.
pub struct GameServer {
    client: reqwest::Client,
    base_url: String,
}

impl GameServer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::transport(format!("Error creating http client: {}", e)))?;

        Ok(GameServer {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, request: &ServerRequest) -> String {
        format!("{}/{}", self.base_url, request.endpoint())
    }

    pub async fn send_and_await(&self, request: &ServerRequest) -> Result<ServerReply, AppError> {
        let url = self.url(request);
        let body = request.body();

        debug!("sending request: {} {}", &url, &body);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let err_msg = format!("Error calling '{}': {}", &url, e);

                warn!("{}", &err_msg);

                AppError::transport(err_msg)
            })?;

        let status = response.status();

        if !status.is_success() {
            let err_msg = format!("'{}' answered with status {}", &url, status);

            warn!("{}", &err_msg);

            return Err(AppError::transport(err_msg));
        }

        let text = response.text().await.map_err(|e| {
            let err_msg = format!("Error reading the response of '{}': {}", &url, e);

            warn!("{}", &err_msg);

            AppError::transport(err_msg)
        })?;

        debug!("received text: {}", &text);

        ServerReply::parse(request, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::{PlayerColor, PlayerType, Position};
    use crate::core::errors::AppErrorKind;

    const STATE: &str = r#"{
        "board": [[["wf"], [], []], [[], [], []], [[], [], ["bf"]]],
        "num_flats": {"1": 9, "-1": 9},
        "num_caps": {"1": 0, "-1": 0},
        "current_player": 1
    }"#;

    #[test]
    fn request_bodies_follow_the_endpoints() {
        let start = ServerRequest::StartGame(GameSetup {
            size: 5,
            white_type: PlayerType::Human,
            black_type: PlayerType::Computer,
        });

        assert_eq!("start_game", start.endpoint());
        assert_eq!(
            json!({"size": 5, "white_type": "human", "black_type": "computer"}),
            start.body()
        );
        assert_eq!(
            json!({"move_idx": 2}),
            ServerRequest::MakeMove { move_idx: 2 }.body()
        );
        assert_eq!(json!({}), ServerRequest::GetComputerMove.body());
        assert_eq!("get_move_hint", ServerRequest::GetMoveHint.endpoint());
    }

    #[test]
    fn builds_urls_without_double_slashes() {
        let server = GameServer::new("http://localhost:8001/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            "http://localhost:8001/get_possible_moves",
            server.url(&ServerRequest::GetPossibleMoves)
        );
    }

    #[test]
    fn parses_start_game_reply() {
        let text = format!(r#"{{"state": {}}}"#, STATE);

        match ServerReply::parse(&ServerRequest::GetPossibleMoves, &text) {
            Err(err) => assert_eq!(AppErrorKind::MalformedResponse, err.kind),
            Ok(reply) => panic!("unexpected reply {:?}", reply),
        }

        let setup = GameSetup {
            size: 3,
            white_type: PlayerType::Human,
            black_type: PlayerType::Human,
        };

        match ServerReply::parse(&ServerRequest::StartGame(setup), &text).unwrap() {
            ServerReply::GameStarted(state) => {
                assert_eq!(3, state.board.size());
                assert_eq!(PlayerColor::White, state.current_player);
            }
            reply => panic!("unexpected reply {:?}", reply),
        }
    }

    #[test]
    fn parses_computer_move_reply() {
        let text = format!(
            r#"{{"move": {{"type": "PlaceFlat", "pos": [2, 2]}}, "state": {}, "result": 2}}"#,
            STATE
        );

        match ServerReply::parse(&ServerRequest::GetComputerMove, &text).unwrap() {
            ServerReply::ComputerMoved { mv, result, .. } => {
                assert_eq!(Position::from(2, 2), mv.pos());
                assert_eq!(GameResult::BlackWin, result);
            }
            reply => panic!("unexpected reply {:?}", reply),
        }
    }

    #[test]
    fn parses_possible_moves_and_hint() {
        let text = r#"{"possible_moves": [
            {"type": "PlaceFlat", "pos": [0, 1]},
            {"type": "MovePiece", "pos": [0, 0], "direction": [1, 0]}
        ]}"#;

        match ServerReply::parse(&ServerRequest::GetPossibleMoves, text).unwrap() {
            ServerReply::PossibleMoves(moves) => assert_eq!(2, moves.len()),
            reply => panic!("unexpected reply {:?}", reply),
        }

        let hint = ServerReply::parse(
            &ServerRequest::GetMoveHint,
            r#"{"type": "PlaceCap", "pos": [1, 1]}"#,
        )
        .unwrap();

        assert_eq!(
            ServerReply::Hint(Move::PlaceCap {
                pos: Position::from(1, 1)
            }),
            hint
        );
    }

    #[test]
    fn malformed_bodies_are_reported_as_such() {
        let cases = [
            (ServerRequest::MakeMove { move_idx: 0 }, "not json"),
            (ServerRequest::MakeMove { move_idx: 0 }, r#"{"result": 1}"#),
            (ServerRequest::GetPossibleMoves, "{}"),
            (ServerRequest::GetMoveHint, r#"{"type": "PlaceFlat"}"#),
        ];

        for (request, text) in cases.iter() {
            let err = ServerReply::parse(request, text).unwrap_err();

            assert_eq!(AppErrorKind::MalformedResponse, err.kind);
        }
    }
}
