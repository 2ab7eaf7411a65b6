use std::convert::TryFrom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_BOARD_SIZE: u8 = 3;
pub const MAX_BOARD_SIZE: u8 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i8")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn name(&self) -> &str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl TryFrom<i8> for PlayerColor {
    type Error = String;

    fn try_from(id: i8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::White),
            -1 => Ok(Self::Black),
            _ => Err(format!("unknown player id {}", id)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    Human,
    Computer,
}

impl PlayerType {
    pub fn name(&self) -> &str {
        match self {
            Self::Human => "human",
            Self::Computer => "computer",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Human => Self::Computer,
            Self::Computer => Self::Human,
        }
    }
}

impl FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "computer" => Ok(Self::Computer),
            _ => Err(format!("unknown player type '{}'", s)),
        }
    }
}

/// Player type chosen for each color when the game starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlayerAssignment {
    pub white: PlayerType,
    pub black: PlayerType,
}

impl PlayerAssignment {
    pub fn get(&self, color: PlayerColor) -> PlayerType {
        match color {
            PlayerColor::White => self.white,
            PlayerColor::Black => self.black,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GameSetup {
    pub size: u8,
    pub white_type: PlayerType,
    pub black_type: PlayerType,
}

impl GameSetup {
    pub fn players(&self) -> PlayerAssignment {
        PlayerAssignment {
            white: self.white_type,
            black: self.black_type,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceKind {
    Flat,
    Wall,
    Cap,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Piece {
    pub color: PlayerColor,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: PlayerColor, kind: PieceKind) -> Self {
        Piece { color, kind }
    }
}

impl TryFrom<String> for Piece {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        let mut chars = code.chars();

        let color = match chars.next() {
            Some('w') => PlayerColor::White,
            Some('b') => PlayerColor::Black,
            _ => return Err(format!("invalid piece code '{}'", code)),
        };

        let kind = match chars.next() {
            Some('f') => PieceKind::Flat,
            Some('w') => PieceKind::Wall,
            Some('c') => PieceKind::Cap,
            _ => return Err(format!("invalid piece code '{}'", code)),
        };

        if chars.next().is_some() {
            return Err(format!("invalid piece code '{}'", code));
        }

        Ok(Piece::new(color, kind))
    }
}

/// Square grid of stacks, `cells[row][col]`, each stack listed bottom first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec<Piece>>>")]
pub struct Board {
    cells: Vec<Vec<Vec<Piece>>>,
}

impl Board {
    pub fn size(&self) -> u8 {
        self.cells.len() as u8
    }

    pub fn stacks(&self) -> impl Iterator<Item = (Position, &[Piece])> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .map(move |(col, stack)| (Position::from(row as u8, col as u8), stack.as_slice()))
        })
    }
}

impl TryFrom<Vec<Vec<Vec<Piece>>>> for Board {
    type Error = String;

    fn try_from(cells: Vec<Vec<Vec<Piece>>>) -> Result<Self, Self::Error> {
        let size = cells.len();

        if size == 0 || size > u8::MAX as usize {
            return Err(format!("invalid board size {}", size));
        }

        if let Some(row) = cells.iter().position(|row| row.len() != size) {
            return Err(format!("board row {} is not {} cells wide", row, size));
        }

        Ok(Board { cells })
    }
}

/// Remaining pieces per color, keyed by the server's player id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub struct PieceCounts {
    #[serde(rename = "1")]
    pub white: u32,
    #[serde(rename = "-1")]
    pub black: u32,
}

impl PieceCounts {
    pub fn get(&self, color: PlayerColor) -> u32 {
        match color {
            PlayerColor::White => self.white,
            PlayerColor::Black => self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub num_flats: PieceCounts,
    pub num_caps: PieceCounts,
    pub current_player: PlayerColor,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum GameResult {
    InProgress,
    BlackWin,
    Draw,
    WhiteWin,
}

impl GameResult {
    pub fn is_over(&self) -> bool {
        *self != Self::InProgress
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InProgress => "Game in progress",
            Self::BlackWin => "Black won!",
            Self::Draw => "Draw!",
            Self::WhiteWin => "White won!",
        }
    }
}

impl TryFrom<u8> for GameResult {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::InProgress),
            2 => Ok(Self::BlackWin),
            3 => Ok(Self::Draw),
            4 => Ok(Self::WhiteWin),
            _ => Err(format!("unknown result code {}", code)),
        }
    }
}

/// Zero-indexed board position, `[row, col]` on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u8; 2]")]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn from(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl From<[u8; 2]> for Position {
    fn from(pair: [u8; 2]) -> Self {
        Position::from(pair[0], pair[1])
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row + 1, self.col + 1)
    }
}

/// Partially entered position, one-indexed as the user types it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OptCoords {
    pub row: Option<u8>,
    pub col: Option<u8>,
}

impl Default for OptCoords {
    fn default() -> Self {
        Self {
            row: None,
            col: None,
        }
    }
}

impl OptCoords {
    /// Zero-indexed position when both coordinates are inside a board of `size`.
    pub fn position(&self, size: u8) -> Option<Position> {
        match self {
            OptCoords {
                row: Some(row),
                col: Some(col),
            } if (1..=size).contains(row) && (1..=size).contains(col) => {
                Some(Position::from(row - 1, col - 1))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "[i8; 2]")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// `[dRow, dCol]` step of the direction.
    pub fn delta(&self) -> [i8; 2] {
        match self {
            Self::Up => [-1, 0],
            Self::Down => [1, 0],
            Self::Left => [0, -1],
            Self::Right => [0, 1],
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Right,
            Self::Right => Self::Up,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Down => Self::Up,
            Self::Left => Self::Down,
            Self::Right => Self::Left,
        }
    }
}

impl TryFrom<[i8; 2]> for Direction {
    type Error = String;

    fn try_from(delta: [i8; 2]) -> Result<Self, Self::Error> {
        Direction::ALL
            .iter()
            .find(|direction| direction.delta() == delta)
            .copied()
            .ok_or_else(|| format!("invalid direction {:?}", delta))
    }
}
