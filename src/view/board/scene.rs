use crate::core::entities::{Board, Piece, PieceKind, Position};

const PIECE_HEIGHT: f32 = 0.2;
const STANDING_OFFSET: f32 = 0.3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedPiece {
    pub pos: Position,
    /// Index in the stack, 0 at the bottom.
    pub level: usize,
    pub piece: Piece,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Every piece of a board snapshot laid out on a unit grid centred on the origin.
///
/// Built from scratch for each snapshot, so equal boards give equal scenes no
/// matter what was shown before.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardScene {
    size: u8,
    pieces: Vec<PlacedPiece>,
}

impl BoardScene {
    pub fn from_board(board: &Board) -> Self {
        let size = board.size();
        let half = size as f32 / 2.0;
        let mut pieces: Vec<PlacedPiece> = vec![];

        for (pos, stack) in board.stacks() {
            for (level, piece) in stack.iter().enumerate() {
                let standing = if piece.kind != PieceKind::Flat {
                    STANDING_OFFSET
                } else {
                    0.0
                };

                pieces.push(PlacedPiece {
                    pos,
                    level,
                    piece: *piece,
                    x: pos.row as f32 - half + 0.5,
                    y: (level + 1) as f32 * PIECE_HEIGHT + standing,
                    z: -(pos.col as f32 - half + 0.5),
                });
            }
        }

        BoardScene { size, pieces }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn pieces(&self) -> &[PlacedPiece] {
        &self.pieces
    }

    /// Pieces at `pos`, bottom first.
    pub fn stack_at(&self, pos: Position) -> Vec<&PlacedPiece> {
        self.pieces.iter().filter(|p| p.pos == pos).collect()
    }

    pub fn top_at(&self, pos: Position) -> Option<&PlacedPiece> {
        self.pieces
            .iter()
            .filter(|p| p.pos == pos)
            .max_by_key(|p| p.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::PlayerColor;

    fn board(json: &str) -> Board {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn places_one_piece_per_stack_entry() {
        let scene = BoardScene::from_board(&board(
            r#"[[["wf", "bf", "wc"], []], [[], ["bw"]]]"#,
        ));

        assert_eq!(4, scene.pieces().len());
        assert_eq!(3, scene.stack_at(Position::from(0, 0)).len());
        assert!(scene.stack_at(Position::from(0, 1)).is_empty());

        let top = scene.top_at(Position::from(0, 0)).unwrap();
        assert_eq!(2, top.level);
        assert_eq!(Piece::new(PlayerColor::White, PieceKind::Cap), top.piece);
    }

    #[test]
    fn walls_and_caps_sit_higher_than_flats() {
        let scene = BoardScene::from_board(&board(r#"[[["wf"], ["bw"]], [["bc"], []]]"#));
        let flat = scene.top_at(Position::from(0, 0)).unwrap();
        let wall = scene.top_at(Position::from(0, 1)).unwrap();
        let cap = scene.top_at(Position::from(1, 0)).unwrap();

        assert!((flat.y - 0.2).abs() < 1e-6);
        assert!((wall.y - 0.5).abs() < 1e-6);
        assert!((cap.y - 0.5).abs() < 1e-6);
        assert!((flat.x + 0.5).abs() < 1e-6);
        assert!((flat.z - 0.5).abs() < 1e-6);
        assert!((cap.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn stacking_raises_each_level() {
        let scene = BoardScene::from_board(&board(r#"[[["wf", "bf", "ww"]]]"#));
        let heights: Vec<f32> = scene.pieces().iter().map(|p| p.y).collect();

        assert!((heights[0] - 0.2).abs() < 1e-6);
        assert!((heights[1] - 0.4).abs() < 1e-6);
        assert!((heights[2] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rendering_the_same_snapshot_twice_is_identical() {
        let snapshot = board(r#"[[["wf", "bw"], [], ["bc"]], [[], ["wf"], []], [[], [], ["bf", "wf"]]]"#);

        let first = BoardScene::from_board(&snapshot);
        let other = BoardScene::from_board(&board(r#"[[["bf"], [], []], [[], [], []], [[], [], []]]"#));
        let second = BoardScene::from_board(&snapshot);

        assert_ne!(first, other);
        assert_eq!(first, second);
    }
}
