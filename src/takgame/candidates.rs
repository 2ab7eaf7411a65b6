use crate::core::moves::{Move, MoveQuery, MoveType};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Valid,
    Invalid,
    NotRequired,
}

impl FieldStatus {
    fn of(required: bool, valid: bool) -> Self {
        match (required, valid) {
            (false, _) => Self::NotRequired,
            (true, true) => Self::Valid,
            (true, false) => Self::Invalid,
        }
    }
}

/// Per-field feedback for a partially entered move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub pos: FieldStatus,
    pub direction: FieldStatus,
    pub split: FieldStatus,
}

/// Legal moves the server listed for the current position, in server order.
#[derive(Debug, Clone, Default)]
pub struct MoveCandidates {
    moves: Vec<Move>,
}

impl MoveCandidates {
    pub fn new(moves: Vec<Move>) -> Self {
        MoveCandidates { moves }
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn get(&self, idx: usize) -> Option<&Move> {
        self.moves.get(idx)
    }

    /// Distinct move types present, in the order the server first lists them.
    pub fn move_types(&self) -> Vec<MoveType> {
        let mut types: Vec<MoveType> = vec![];

        for candidate in &self.moves {
            if !types.contains(&candidate.move_type()) {
                types.push(candidate.move_type());
            }
        }

        types
    }

    /// Index of the first candidate matching every field the query's type needs.
    pub fn find(&self, query: &MoveQuery) -> Option<usize> {
        self.moves.iter().position(|candidate| query.matches(candidate))
    }

    pub fn validate(&self, query: &MoveQuery) -> FieldValidation {
        let move_type = query.move_type;

        let pos_ok = self.moves.iter().any(|m| query.matches_pos(m));
        let direction_ok = self
            .moves
            .iter()
            .any(|m| query.matches_pos(m) && query.matches_direction(m));
        let split_ok = self.moves.iter().any(|m| query.matches(m));

        FieldValidation {
            pos: FieldStatus::of(true, pos_ok),
            direction: FieldStatus::of(move_type.requires_direction(), direction_ok),
            split: FieldStatus::of(move_type.requires_split(), split_ok),
        }
    }
}
