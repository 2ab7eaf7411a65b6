use super::scene::BoardScene;
use crate::core::entities::{OptCoords, Position};
use crate::view::theme::Theme;
use tui::layout::Constraint;
use tui::style::Style;
use tui::widgets::{Cell, Row};

const CELL_WIDTH: u16 = 3;

struct BoardCell {
    cell_text: String,
    cell_style: Option<Style>,
}

impl BoardCell {
    fn new(cell_text: String, cell_style: Option<Style>) -> Self {
        BoardCell {
            cell_text,
            cell_style,
        }
    }

    fn spacing() -> Self {
        Self::new("".to_string(), None)
    }
}

struct BoardRow {
    cells: Vec<BoardCell>,
}

impl BoardRow {
    fn from(cells: Vec<BoardCell>) -> Self {
        BoardRow { cells }
    }
}

/// Top-down view of the board: each square shows its top piece and, for taller
/// stacks, how many pieces it holds.
pub struct BoardTable {
    rows: Vec<BoardRow>,
    number_column_size: u8,
    theme: Theme,
    scene: Option<BoardScene>,
    highlight_coords: OptCoords,
    refresh_ui_request: bool,
}

impl BoardTable {
    pub fn new(theme: &Theme) -> Self {
        BoardTable {
            rows: vec![],
            number_column_size: 3,
            theme: theme.clone(),
            scene: None,
            highlight_coords: OptCoords::default(),
            refresh_ui_request: true,
        }
    }

    pub fn set_scene(&mut self, scene: BoardScene) {
        if self.scene.as_ref() != Some(&scene) {
            self.scene = Some(scene);
            self.refresh_ui_request = true;
        }
    }

    pub fn scene(&self) -> Option<&BoardScene> {
        self.scene.as_ref()
    }

    pub fn change_highlight_coords(&mut self, coords: OptCoords) {
        if self.highlight_coords != coords {
            self.highlight_coords = coords;
            self.refresh_ui_request = true;
        }
    }

    fn board_size(&self) -> u8 {
        self.scene.as_ref().map(|scene| scene.size()).unwrap_or(0)
    }

    /// Width and height the table needs, in terminal cells.
    pub fn canvas_size(&self) -> (u16, u16) {
        let board_size = self.board_size() as u16;

        (
            2 * self.number_column_size as u16 + board_size * CELL_WIDTH,
            board_size + 2,
        )
    }

    pub fn get_tui_rows(&mut self) -> Vec<Row<'static>> {
        if self.refresh_ui_request {
            self.refresh_ui_rows();
            self.refresh_ui_request = false;
        }

        self.rows
            .iter()
            .map(|board_row| {
                Row::new(
                    board_row
                        .cells
                        .iter()
                        .map(|board_cell| {
                            Cell::from(board_cell.cell_text.clone())
                                .style(board_cell.cell_style.unwrap_or_default())
                        })
                        .collect::<Vec<Cell>>(),
                )
            })
            .collect::<Vec<Row>>()
    }

    pub fn get_tui_widths(&self) -> Vec<Constraint> {
        let mut widths: Vec<Constraint> = vec![Constraint::Length(self.number_column_size as u16)];

        for _ in 1..=self.board_size() {
            widths.push(Constraint::Length(CELL_WIDTH));
        }
        widths.push(Constraint::Length(self.number_column_size as u16)); // number column

        widths
    }

    fn refresh_ui_rows(&mut self) {
        let default_style = Style::default()
            .bg(self.theme.board_bg_color)
            .fg(self.theme.text_fg_color);
        let header_style = default_style.add_modifier(self.theme.header_text_style);

        let mut rows: Vec<BoardRow> = vec![self.make_header_row(header_style)];

        for line in 1..=self.board_size() {
            rows.push(self.make_line_row(default_style, header_style, line));
        }

        rows.push(self.make_header_row(header_style));

        self.rows = rows
    }

    fn is_column_highlighted(&self, column: u8) -> bool {
        matches!(self.highlight_coords.col, Some(c) if c == column)
    }

    fn is_row_highlighted(&self, row: u8) -> bool {
        matches!(self.highlight_coords.row, Some(r) if r == row)
    }

    fn make_header_row(&self, default_header_style: Style) -> BoardRow {
        let mut header_cells: Vec<BoardCell> = vec![BoardCell::spacing()];

        for column in 1..=self.board_size() {
            let header_style = if self.is_column_highlighted(column) {
                default_header_style.bg(self.theme.board_bg_hl_color)
            } else {
                default_header_style
            };

            header_cells.push(BoardCell::new(
                format!("{: ^3}", column),
                Some(header_style),
            ));
        }
        header_cells.push(BoardCell::spacing()); // number column

        BoardRow::from(header_cells)
    }

    fn make_line_row(&self, default_style: Style, header_style: Style, line_nr: u8) -> BoardRow {
        let header_style = if self.is_row_highlighted(line_nr) {
            header_style.bg(self.theme.board_bg_hl_color)
        } else {
            header_style
        };

        let mut board_line: Vec<BoardCell> = vec![BoardCell::new(
            format!("{: >2} ", line_nr),
            Some(header_style),
        )];

        for column in 1..=self.board_size() {
            let pos = Position::from(line_nr - 1, column - 1);

            let mut cell_style = if (line_nr + column) % 2 == 0 {
                default_style
            } else {
                default_style.bg(self.theme.board_bg_alt_color)
            };

            if self.is_row_highlighted(line_nr) || self.is_column_highlighted(column) {
                cell_style = cell_style.bg(self.theme.board_bg_hl_color);
            }

            let scene_top = self.scene.as_ref().and_then(|scene| {
                scene
                    .top_at(pos)
                    .map(|top| (top.piece, scene.stack_at(pos).len()))
            });

            let (cell_text, cell_style) = match scene_top {
                Some((piece, height)) => {
                    let height_label = if height > 1 {
                        height.to_string()
                    } else {
                        " ".to_string()
                    };

                    (
                        format!(" {}{}", self.theme.piece_char(&piece), height_label),
                        cell_style.fg(self.theme.piece_color(piece.color)),
                    )
                }
                None => (format!(" {} ", self.theme.empty_cell_char), cell_style),
            };

            board_line.push(BoardCell::new(cell_text, Some(cell_style)));
        }

        board_line.push(BoardCell::new(
            format!(" {: <2}", line_nr),
            Some(header_style),
        )); // number column

        BoardRow::from(board_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::Board;

    fn table(json: &str) -> BoardTable {
        let board: Board = serde_json::from_str(json).unwrap();
        let mut table = BoardTable::new(&Theme::default());

        table.set_scene(BoardScene::from_board(&board));
        table.get_tui_rows();
        table
    }

    fn texts(table: &BoardTable) -> Vec<Vec<String>> {
        table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.cell_text.clone()).collect())
            .collect()
    }

    #[test]
    fn shows_top_piece_and_stack_height() {
        let table = table(r#"[[["wf", "bc"], []], [[], ["bw"]]]"#);
        let texts = texts(&table);

        assert_eq!(4, texts.len());
        assert_eq!(vec!["", " 1 ", " 2 ", ""], texts[0]);
        assert_eq!(vec![" 1 ", " ▲2", " · ", " 1 "], texts[1]);
        assert_eq!(vec![" 2 ", " · ", " ▮ ", " 2 "], texts[2]);
        assert_eq!((12, 4), table.canvas_size());
        assert_eq!(4, table.get_tui_widths().len());
    }

    #[test]
    fn highlight_marks_row_and_column() {
        let mut table = table(r#"[[[], []], [[], []]]"#);
        let theme = Theme::default();

        table.change_highlight_coords(OptCoords {
            row: Some(2),
            col: None,
        });
        table.get_tui_rows();

        let row_two_style = table.rows[2].cells[1].cell_style.unwrap();
        let row_one_style = table.rows[1].cells[1].cell_style.unwrap();

        assert_eq!(Some(theme.board_bg_hl_color), row_two_style.bg);
        assert_ne!(Some(theme.board_bg_hl_color), row_one_style.bg);
    }
}
