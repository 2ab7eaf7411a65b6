use crate::core::entities::{Direction, OptCoords};
use crate::core::errors::AppError;
use crate::core::helpers::{parse_input_coord, parse_split};
use crate::core::moves::{MoveQuery, MoveType};
use crate::view::events::{Event, EventHandler, EventSideEffect};
use termion::event::Key;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveField {
    Type,
    Row,
    Col,
    Direction,
    Split,
}

impl MoveField {
    pub fn label(&self) -> &str {
        match self {
            Self::Type => "Type",
            Self::Row => "Row",
            Self::Col => "Col",
            Self::Direction => "Direction",
            Self::Split => "Split",
        }
    }
}

/// Move entry form. Only the fields the selected move type needs are shown.
pub struct MoveForm {
    move_types: Vec<MoveType>,
    type_idx: usize,
    row_input: String,
    col_input: String,
    direction: Option<Direction>,
    split_input: String,
    focus: MoveField,
    max_coord_len: usize,
}

impl Default for MoveForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveForm {
    pub fn new() -> Self {
        MoveForm {
            move_types: vec![],
            type_idx: 0,
            row_input: "".to_string(),
            col_input: "".to_string(),
            direction: None,
            split_input: "".to_string(),
            focus: MoveField::Type,
            max_coord_len: 1,
        }
    }

    /// Replaces the selectable move types, keeping the current one when still offered.
    pub fn set_move_types(&mut self, move_types: Vec<MoveType>) {
        let current = self.move_type();

        self.type_idx = current
            .and_then(|current| move_types.iter().position(|t| *t == current))
            .unwrap_or(0);
        self.move_types = move_types;

        if !self.visible_fields().contains(&self.focus) {
            self.focus = MoveField::Type;
        }
    }

    pub fn move_type(&self) -> Option<MoveType> {
        self.move_types.get(self.type_idx).copied()
    }

    pub fn focused(&self) -> MoveField {
        self.focus
    }

    pub fn visible_fields(&self) -> Vec<MoveField> {
        let mut fields = vec![MoveField::Type, MoveField::Row, MoveField::Col];

        if let Some(move_type) = self.move_type() {
            if move_type.requires_direction() {
                fields.push(MoveField::Direction);
            }
            if move_type.requires_split() {
                fields.push(MoveField::Split);
            }
        }

        fields
    }

    pub fn field_text(&self, field: MoveField) -> String {
        match field {
            MoveField::Type => self
                .move_type()
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| "-".to_string()),
            MoveField::Row => self.row_input.clone(),
            MoveField::Col => self.col_input.clone(),
            MoveField::Direction => self
                .direction
                .map(|d| d.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
            MoveField::Split => self.split_input.clone(),
        }
    }

    /// Coordinates entered so far, one-indexed, for highlighting on the board.
    pub fn coords(&self) -> OptCoords {
        OptCoords {
            row: parse_input_coord(&self.row_input),
            col: parse_input_coord(&self.col_input),
        }
    }

    pub fn set_board_size(&mut self, size: u8) {
        self.max_coord_len = size.to_string().len();
    }

    /// Query for the entered fields, leaving out those the move type ignores.
    pub fn query(&self, board_size: u8) -> Result<MoveQuery, AppError> {
        let move_type = self
            .move_type()
            .ok_or_else(|| AppError::invalid_input("no move type available"))?;

        let mut query = MoveQuery::new(move_type);
        query.pos = self.coords().position(board_size);

        if move_type.requires_direction() {
            query.direction = self.direction;
        }

        if move_type.requires_split() && !self.split_input.trim().is_empty() {
            query.split = Some(parse_split(&self.split_input)?);
        }

        Ok(query)
    }

    /// Like [`MoveForm::query`] but an unparsable split is treated as empty.
    pub fn partial_query(&self, board_size: u8) -> Option<MoveQuery> {
        let move_type = self.move_type()?;
        let mut query = MoveQuery::new(move_type);

        query.pos = self.coords().position(board_size);
        if move_type.requires_direction() {
            query.direction = self.direction;
        }
        if move_type.requires_split() {
            query.split = parse_split(&self.split_input).ok();
        }

        Some(query)
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };

        self.focus = fields[next];
    }

    fn cycle(&mut self, forward: bool) {
        match self.focus {
            MoveField::Type if !self.move_types.is_empty() => {
                let len = self.move_types.len();
                self.type_idx = if forward {
                    (self.type_idx + 1) % len
                } else {
                    (self.type_idx + len - 1) % len
                };
            }
            MoveField::Direction => {
                self.direction = Some(match (self.direction, forward) {
                    (None, _) => Direction::Up,
                    (Some(d), true) => d.next(),
                    (Some(d), false) => d.previous(),
                });
            }
            _ => {}
        }
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            MoveField::Row => Some(&mut self.row_input),
            MoveField::Col => Some(&mut self.col_input),
            MoveField::Split => Some(&mut self.split_input),
            _ => None,
        }
    }

    fn type_char(&mut self, c: char) {
        let max_coord_len = self.max_coord_len;
        let focus = self.focus;

        if let Some(input) = self.focused_input() {
            match focus {
                MoveField::Row | MoveField::Col if c.is_ascii_digit() => {
                    if input.len() >= max_coord_len {
                        input.clear();
                    }
                    input.push(c);
                }
                MoveField::Split if c.is_ascii_digit() || c == ',' => input.push(c),
                _ => {}
            }
        }
    }
}

impl EventHandler<Key> for MoveForm {
    fn on_event(&mut self, event: Event<Key>) -> EventSideEffect {
        match event {
            Event::Input(input) => match input {
                Key::Char('q') | Key::Ctrl('c') => EventSideEffect::QuitApp,
                Key::Char('\n') => EventSideEffect::Submit,
                Key::Char('?') => EventSideEffect::RequestHint,
                Key::Char('r') => EventSideEffect::Retry,
                Key::Char('n') => EventSideEffect::NewGame,
                Key::Char('\t') | Key::Down => {
                    self.move_focus(true);
                    EventSideEffect::None
                }
                Key::BackTab | Key::Up => {
                    self.move_focus(false);
                    EventSideEffect::None
                }
                Key::Left => {
                    self.cycle(false);
                    EventSideEffect::None
                }
                Key::Right | Key::Char(' ') => {
                    self.cycle(true);
                    EventSideEffect::None
                }
                Key::Backspace => {
                    if let Some(input) = self.focused_input() {
                        input.pop();
                    } else if self.focus == MoveField::Direction {
                        self.direction = None;
                    }
                    EventSideEffect::None
                }
                Key::Char(c) => {
                    self.type_char(c);
                    EventSideEffect::None
                }
                _ => EventSideEffect::None,
            },
            _ => EventSideEffect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entities::Position;
    use crate::core::errors::AppErrorKind;

    fn press(form: &mut MoveForm, keys: &[Key]) {
        for key in keys {
            form.on_event(Event::Input(*key));
        }
    }

    fn form() -> MoveForm {
        let mut form = MoveForm::new();

        form.set_board_size(5);
        form.set_move_types(vec![
            MoveType::PlaceFlat,
            MoveType::MovePiece,
            MoveType::SplitStack,
        ]);
        form
    }

    #[test]
    fn placement_query_leaves_out_direction_and_split() {
        let mut form = form();

        press(
            &mut form,
            &[Key::Char('\t'), Key::Char('2'), Key::Char('\t'), Key::Char('3')],
        );

        assert_eq!(
            MoveQuery {
                move_type: MoveType::PlaceFlat,
                pos: Some(Position::from(1, 2)),
                direction: None,
                split: None,
            },
            form.query(5).unwrap()
        );
        assert_eq!(
            vec![MoveField::Type, MoveField::Row, MoveField::Col],
            form.visible_fields()
        );
    }

    #[test]
    fn split_stack_query_carries_every_field() {
        let mut form = form();

        press(&mut form, &[Key::Right, Key::Right]);
        assert_eq!(Some(MoveType::SplitStack), form.move_type());

        press(
            &mut form,
            &[
                Key::Char('\t'),
                Key::Char('1'),
                Key::Char('\t'),
                Key::Char('1'),
                Key::Char('\t'),
                Key::Right,
                Key::Right,
                Key::Char('\t'),
                Key::Char('2'),
                Key::Char(','),
                Key::Char('1'),
            ],
        );

        let query = form.query(5).unwrap();

        assert_eq!(Some(Position::from(0, 0)), query.pos);
        assert_eq!(Some(Direction::Down), query.direction);
        assert_eq!(Some(vec![2, 1]), query.split);
        assert_eq!("2,1", form.field_text(MoveField::Split));
    }

    #[test]
    fn unparsable_split_is_an_input_error() {
        let mut form = form();

        press(
            &mut form,
            &[Key::Left, Key::BackTab, Key::Char('2'), Key::Char(','), Key::Char(',')],
        );

        assert_eq!(MoveField::Split, form.focused());
        assert_eq!(
            AppErrorKind::InvalidInput,
            form.query(5).unwrap_err().kind
        );
        assert_eq!(None, form.partial_query(5).unwrap().split);
    }

    #[test]
    fn coordinates_outside_the_board_are_empty() {
        let mut form = form();

        press(
            &mut form,
            &[Key::Char('\t'), Key::Char('7'), Key::Char('\t'), Key::Char('1')],
        );

        assert_eq!(
            OptCoords {
                row: Some(7),
                col: Some(1)
            },
            form.coords()
        );
        assert_eq!(None, form.query(5).unwrap().pos);

        press(&mut form, &[Key::BackTab, Key::Char('4')]);
        assert_eq!(Some(Position::from(3, 0)), form.query(5).unwrap().pos);
    }

    #[test]
    fn keeps_selected_type_when_candidates_refresh() {
        let mut form = form();

        press(&mut form, &[Key::Right]);
        form.set_move_types(vec![MoveType::MovePiece, MoveType::PlaceWall]);

        assert_eq!(Some(MoveType::MovePiece), form.move_type());

        form.set_move_types(vec![MoveType::PlaceWall]);
        assert_eq!(Some(MoveType::PlaceWall), form.move_type());
    }

    #[test]
    fn shortcut_keys_map_to_side_effects() {
        let mut form = form();

        assert_eq!(
            EventSideEffect::RequestHint,
            form.on_event(Event::Input(Key::Char('?')))
        );
        assert_eq!(
            EventSideEffect::Retry,
            form.on_event(Event::Input(Key::Char('r')))
        );
        assert_eq!(
            EventSideEffect::Submit,
            form.on_event(Event::Input(Key::Char('\n')))
        );
    }
}
