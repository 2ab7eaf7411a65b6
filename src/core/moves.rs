use crate::core::entities::{Direction, Position};
use serde::Deserialize;
use std::fmt;

/// A legal move as listed by the server, `{"type": ..., "pos": [r, c], ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum Move {
    PlaceFlat {
        pos: Position,
    },
    PlaceWall {
        pos: Position,
    },
    PlaceCap {
        pos: Position,
    },
    MovePiece {
        pos: Position,
        direction: Direction,
    },
    SplitStack {
        pos: Position,
        direction: Direction,
        split: Vec<u32>,
    },
}

impl Move {
    pub fn move_type(&self) -> MoveType {
        match self {
            Self::PlaceFlat { .. } => MoveType::PlaceFlat,
            Self::PlaceWall { .. } => MoveType::PlaceWall,
            Self::PlaceCap { .. } => MoveType::PlaceCap,
            Self::MovePiece { .. } => MoveType::MovePiece,
            Self::SplitStack { .. } => MoveType::SplitStack,
        }
    }

    pub fn pos(&self) -> Position {
        match self {
            Self::PlaceFlat { pos }
            | Self::PlaceWall { pos }
            | Self::PlaceCap { pos }
            | Self::MovePiece { pos, .. }
            | Self::SplitStack { pos, .. } => *pos,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::MovePiece { direction, .. } | Self::SplitStack { direction, .. } => {
                Some(*direction)
            }
            _ => None,
        }
    }

    pub fn split(&self) -> Option<&[u32]> {
        match self {
            Self::SplitStack { split, .. } => Some(split.as_slice()),
            _ => None,
        }
    }

    /// One-line description, e.g. `SplitStack - (2,3) - Left - [2,1]`.
    pub fn describe(&self) -> String {
        let mut text = format!("{} - {}", self.move_type(), self.pos());

        if let Some(direction) = self.direction() {
            text.push_str(&format!(" - {}", direction.label()));
        }

        if let Some(split) = self.split() {
            let counts: Vec<String> = split.iter().map(|count| count.to_string()).collect();
            text.push_str(&format!(" - [{}]", counts.join(",")));
        }

        text
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveType {
    PlaceFlat,
    PlaceWall,
    PlaceCap,
    MovePiece,
    SplitStack,
}

impl MoveType {
    pub fn name(&self) -> &str {
        match self {
            Self::PlaceFlat => "PlaceFlat",
            Self::PlaceWall => "PlaceWall",
            Self::PlaceCap => "PlaceCap",
            Self::MovePiece => "MovePiece",
            Self::SplitStack => "SplitStack",
        }
    }

    pub fn requires_direction(&self) -> bool {
        matches!(self, Self::MovePiece | Self::SplitStack)
    }

    pub fn requires_split(&self) -> bool {
        matches!(self, Self::SplitStack)
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Move parameters as entered by the user. `None` means the field is still empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveQuery {
    pub move_type: MoveType,
    pub pos: Option<Position>,
    pub direction: Option<Direction>,
    pub split: Option<Vec<u32>>,
}

impl MoveQuery {
    pub fn new(move_type: MoveType) -> Self {
        MoveQuery {
            move_type,
            pos: None,
            direction: None,
            split: None,
        }
    }

    pub fn matches_pos(&self, candidate: &Move) -> bool {
        candidate.move_type() == self.move_type && self.pos == Some(candidate.pos())
    }

    pub fn matches_direction(&self, candidate: &Move) -> bool {
        !self.move_type.requires_direction() || self.direction == candidate.direction()
    }

    pub fn matches_split(&self, candidate: &Move) -> bool {
        !self.move_type.requires_split() || self.split.as_deref() == candidate.split()
    }

    /// True when every field the query's move type needs equals the candidate's.
    pub fn matches(&self, candidate: &Move) -> bool {
        self.matches_pos(candidate)
            && self.matches_direction(candidate)
            && self.matches_split(candidate)
    }
}
