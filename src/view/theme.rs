use crate::core::entities::{Piece, PieceKind, PlayerColor};
use crate::core::helpers::parse_color;
use tui::style::{Color, Modifier};

fn color(hex: &str) -> Color {
    parse_color(hex).unwrap_or(Color::Reset)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub board_bg_color: Color,
    pub board_bg_alt_color: Color,
    pub board_bg_hl_color: Color,
    pub text_fg_color: Color,
    pub header_text_style: Modifier,
    pub empty_cell_char: String,
    pub flat_char: String,
    pub wall_char: String,
    pub cap_char: String,
    pub white_piece_color: Color,
    pub black_piece_color: Color,
    pub field_valid_color: Color,
    pub field_invalid_color: Color,
    pub error_message_fg: Color,
    pub error_message_bg: Color,
    pub loading_label_fg: Color,
    pub result_fg: Color,
}

impl Theme {
    pub fn piece_char(&self, piece: &Piece) -> &str {
        match piece.kind {
            PieceKind::Flat => &self.flat_char,
            PieceKind::Wall => &self.wall_char,
            PieceKind::Cap => &self.cap_char,
        }
    }

    pub fn piece_color(&self, color: PlayerColor) -> Color {
        match color {
            PlayerColor::White => self.white_piece_color,
            PlayerColor::Black => self.black_piece_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            board_bg_color: color("#af9769"),
            board_bg_alt_color: color("#7d6c4b"),
            board_bg_hl_color: color("#e3c388"),
            text_fg_color: color("#1c1f25"),
            header_text_style: Modifier::BOLD,
            empty_cell_char: "·".to_string(),
            flat_char: "■".to_string(),
            wall_char: "▮".to_string(),
            cap_char: "▲".to_string(),
            white_piece_color: color("#ffffff"),
            black_piece_color: color("#000000"),
            field_valid_color: color("#c3fc7e"),
            field_invalid_color: color("#fc7e7e"),
            error_message_fg: color("#ffffff"),
            error_message_bg: color("#ff0000"),
            loading_label_fg: color("#00ff00"),
            result_fg: color("#ffd700"),
        }
    }
}
