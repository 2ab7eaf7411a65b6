use crate::core::entities::{GameSetup, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::view::events::{Event, EventHandler, EventSideEffect};
use termion::event::Key;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetupField {
    Size,
    WhiteType,
    BlackType,
}

impl SetupField {
    const ALL: [SetupField; 3] = [SetupField::Size, SetupField::WhiteType, SetupField::BlackType];

    pub fn label(&self) -> &str {
        match self {
            Self::Size => "Board size",
            Self::WhiteType => "White",
            Self::BlackType => "Black",
        }
    }
}

/// Game type form shown before a game starts.
pub struct SetupForm {
    setup: GameSetup,
    focus: usize,
}

impl SetupForm {
    pub fn new(setup: GameSetup) -> Self {
        SetupForm { setup, focus: 0 }
    }

    pub fn setup(&self) -> GameSetup {
        self.setup
    }

    pub fn focused(&self) -> SetupField {
        SetupField::ALL[self.focus]
    }

    /// `(field, value, focused)` for each line of the form.
    pub fn fields(&self) -> Vec<(SetupField, String, bool)> {
        SetupField::ALL
            .iter()
            .map(|field| {
                let value = match field {
                    SetupField::Size => format!("{}x{}", self.setup.size, self.setup.size),
                    SetupField::WhiteType => self.setup.white_type.name().to_string(),
                    SetupField::BlackType => self.setup.black_type.name().to_string(),
                };

                (*field, value, *field == self.focused())
            })
            .collect()
    }

    fn change_value(&mut self, forward: bool) {
        match self.focused() {
            SetupField::Size => {
                self.setup.size = if forward {
                    (self.setup.size + 1).min(MAX_BOARD_SIZE)
                } else {
                    (self.setup.size - 1).max(MIN_BOARD_SIZE)
                }
            }
            SetupField::WhiteType => self.setup.white_type = self.setup.white_type.toggle(),
            SetupField::BlackType => self.setup.black_type = self.setup.black_type.toggle(),
        }
    }
}

impl EventHandler<Key> for SetupForm {
    fn on_event(&mut self, event: Event<Key>) -> EventSideEffect {
        match event {
            Event::Input(input) => match input {
                Key::Char('q') | Key::Ctrl('c') => EventSideEffect::QuitApp,
                Key::Char('\n') => EventSideEffect::Submit,
                Key::Up | Key::BackTab => {
                    self.focus = (self.focus + SetupField::ALL.len() - 1) % SetupField::ALL.len();
                    EventSideEffect::None
                }
                Key::Down | Key::Char('\t') => {
                    self.focus = (self.focus + 1) % SetupField::ALL.len();
                    EventSideEffect::None
                }
                Key::Left => {
                    self.change_value(false);
                    EventSideEffect::None
                }
                Key::Right | Key::Char(' ') => {
                    self.change_value(true);
                    EventSideEffect::None
                }
                _ => EventSideEffect::None,
            },
            _ => EventSideEffect::None,
        }
    }
}
