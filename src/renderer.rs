use crate::core::config::AppConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::entities::{PieceKind, PlayerColor};
use crate::core::errors::AppError;
use crate::core::server::{GameServer, ServerRequest};
use crate::takgame::candidates::{FieldStatus, FieldValidation};
use crate::takgame::session::{Outgoing, Session, SessionState};
use crate::view::board::{BoardScene, BoardTable};
use crate::view::controls::{MoveField, MoveForm, SetupForm};
use crate::view::events::{Config, Event, EventHandler, EventSideEffect, Events};
use crate::view::theme::Theme;
use log::info;
use std::time::Duration;
use termion::event::Key;
use termion::raw::IntoRawMode;
use termion::screen::AlternateScreen;
use tui::backend::{Backend, TermionBackend};
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, List, ListItem, Paragraph, Table};
use tui::{Frame, Terminal};

const SIDE_PANEL_WIDTH: u16 = 48;

/// Everything the terminal shows, plus the session driving it.
struct App {
    session: Session,
    setup_form: SetupForm,
    move_form: MoveForm,
    board_table: BoardTable,
    theme: Theme,
    computer_move_delay: Duration,
    ticks: usize,
}

impl App {
    fn new(config: &AppConfig, theme: &Theme) -> Self {
        App {
            session: Session::new(),
            setup_form: SetupForm::new(config.default_setup()),
            move_form: MoveForm::new(),
            board_table: BoardTable::new(theme),
            theme: theme.clone(),
            computer_move_delay: config.computer_move_delay(),
            ticks: 0,
        }
    }

    fn board_size(&self) -> u8 {
        self.session
            .snapshot()
            .map(|state| state.board.size())
            .unwrap_or(0)
    }

    fn send(&self, dispatcher: &Dispatcher<Event<Key>>, outgoing: Outgoing) {
        let delay = if outgoing.request == ServerRequest::GetComputerMove {
            self.computer_move_delay
        } else {
            Duration::from_millis(0)
        };

        dispatcher.dispatch(outgoing.id, outgoing.request, delay);
    }

    fn send_result(
        &self,
        dispatcher: &Dispatcher<Event<Key>>,
        outgoing: Result<Outgoing, AppError>,
    ) {
        // failures are already recorded by the session and shown from there
        if let Ok(outgoing) = outgoing {
            self.send(dispatcher, outgoing);
        }
    }

    /// Returns false once the user asked to quit.
    fn on_event(&mut self, event: Event<Key>, dispatcher: &Dispatcher<Event<Key>>) -> bool {
        match event {
            Event::Input(key) => {
                if self.session.state() == SessionState::AwaitingGameTypeSubmission {
                    match self.setup_form.on_event(Event::Input(key)) {
                        EventSideEffect::QuitApp => return false,
                        EventSideEffect::Submit => {
                            let outgoing = self.session.start_game(self.setup_form.setup());
                            self.send_result(dispatcher, outgoing);
                        }
                        _ => {}
                    }
                } else {
                    match self.move_form.on_event(Event::Input(key)) {
                        EventSideEffect::QuitApp => return false,
                        EventSideEffect::Submit => {
                            match self.move_form.query(self.board_size()) {
                                Ok(query) => {
                                    let outgoing = self.session.submit_move(&query);
                                    self.send_result(dispatcher, outgoing);
                                }
                                Err(err) => self.session.report_error(err),
                            }
                        }
                        EventSideEffect::RequestHint => {
                            let outgoing = self.session.request_hint();
                            self.send_result(dispatcher, outgoing);
                        }
                        EventSideEffect::Retry => {
                            let outgoing = self.session.retry();
                            self.send_result(dispatcher, outgoing);
                        }
                        EventSideEffect::NewGame => {
                            if self.session.reset().is_ok() {
                                info!("back to game setup");
                                self.move_form = MoveForm::new();
                            }
                        }
                        EventSideEffect::None => {}
                    }

                    self.board_table
                        .change_highlight_coords(self.move_form.coords());
                }
            }
            Event::Tick => {
                self.ticks = self.ticks.wrapping_add(1);
            }
            Event::Server(server_event) => {
                if let Some(outgoing) = self
                    .session
                    .handle_reply(server_event.id, server_event.result)
                {
                    self.send(dispatcher, outgoing);
                }

                self.sync_views();
            }
        }

        true
    }

    fn sync_views(&mut self) {
        if let Some(state) = self.session.snapshot() {
            self.board_table
                .set_scene(BoardScene::from_board(&state.board));
            self.move_form.set_board_size(state.board.size());
        }

        self.move_form
            .set_move_types(self.session.candidates().move_types());
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        match self.session.state() {
            SessionState::AwaitingGameTypeSubmission => self.draw_setup(f),
            _ => self.draw_game(f),
        }
    }

    fn draw_setup<B: Backend>(&mut self, f: &mut Frame<B>) {
        let area = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(0)].as_ref())
            .split(Rect {
                width: area.width.min(SIDE_PANEL_WIDTH),
                ..area
            });

        let mut lines: Vec<Spans> = vec![];

        for (field, value, focused) in self.setup_form.fields() {
            let value_style = if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };

            lines.push(Spans::from(vec![
                Span::raw(format!("{: <12}", field.label())),
                Span::styled(format!("< {} >", value), value_style),
            ]));
        }

        lines.push(Spans::from(""));
        lines.push(Spans::from(if self.session.is_busy() {
            Span::styled(
                "Starting game...",
                Style::default().fg(self.theme.loading_label_fg),
            )
        } else {
            Span::raw("↑/↓ select  ←/→ change  enter start  q quit")
        }));

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("New game")),
            chunks[0],
        );
        f.render_widget(self.message_paragraph(), chunks[1]);
    }

    fn draw_game<B: Backend>(&mut self, f: &mut Frame<B>) {
        let area = f.size();
        let (board_width, board_height) = self.board_table.canvas_size();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Length(board_width + 2),
                    Constraint::Length(SIDE_PANEL_WIDTH),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(board_height + 2), Constraint::Min(0)].as_ref())
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(5),
                    Constraint::Length(7),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(columns[1]);

        let board_style = Style::default()
            .bg(self.theme.board_bg_color)
            .fg(self.theme.text_fg_color);
        let tui_widths = self.board_table.get_tui_widths();
        let table = Table::new(self.board_table.get_tui_rows())
            .block(Block::default().borders(Borders::ALL).title("Board"))
            .style(board_style)
            .column_spacing(0)
            .widths(&tui_widths);

        f.render_widget(table, left[0]);
        f.render_widget(self.stack_paragraph(), left[1]);
        f.render_widget(self.status_paragraph(), right[0]);
        f.render_widget(self.controls_paragraph(), right[1]);
        f.render_widget(self.message_paragraph(), right[2]);
        f.render_widget(self.history_list(right[3].height), right[3]);
    }

    fn status_paragraph(&self) -> Paragraph<'static> {
        let mut lines: Vec<Spans> = vec![];

        if let Some(state) = self.session.snapshot() {
            let to_move = state.current_player;
            let player_type = self
                .session
                .player_type(to_move)
                .map(|t| t.name().to_string())
                .unwrap_or_default();

            lines.push(Spans::from(format!(
                "To move: {} ({})",
                to_move.name(),
                player_type
            )));

            for color in [PlayerColor::White, PlayerColor::Black].iter() {
                lines.push(Spans::from(format!(
                    "{: <6} {: >2} flats  {} caps",
                    color.name(),
                    state.num_flats.get(*color),
                    state.num_caps.get(*color)
                )));
            }

            if let Some(scene) = self.board_table.scene() {
                lines.push(Spans::from(format!(
                    "{} pieces on the board",
                    scene.pieces().len()
                )));
            }
        }

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"))
    }

    fn controls_paragraph(&self) -> Paragraph<'static> {
        let mut lines: Vec<Spans> = vec![];
        let title;

        match self.session.state() {
            SessionState::AwaitingHumanMove(color) => {
                title = format!(
                    "{} to move, {} legal moves",
                    color.name(),
                    self.session.candidates().len()
                );

                if self.session.candidates().is_empty() {
                    lines.push(Spans::from(Span::styled(
                        "Loading legal moves...",
                        Style::default().fg(self.theme.loading_label_fg),
                    )));
                } else {
                    let validation = self
                        .move_form
                        .partial_query(self.board_size())
                        .map(|query| self.session.candidates().validate(&query));

                    for field in self.move_form.visible_fields() {
                        lines.push(self.field_line(field, validation));
                    }
                }
            }
            SessionState::AwaitingComputerMove(color) => {
                title = format!("{} to move", color.name());

                lines.push(Spans::from(Span::styled(
                    format!("Computer is thinking{}", ".".repeat(self.ticks % 4)),
                    Style::default().fg(self.theme.loading_label_fg),
                )));
            }
            SessionState::GameOver(result) => {
                title = "Game over".to_string();

                lines.push(Spans::from(Span::styled(
                    result.message().to_string(),
                    Style::default()
                        .fg(self.theme.result_fg)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Spans::from(""));
                lines.push(Spans::from("n new game  q quit"));
            }
            SessionState::AwaitingGameTypeSubmission => {
                title = "".to_string();
            }
        }

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title))
    }

    fn field_line(&self, field: MoveField, validation: Option<FieldValidation>) -> Spans<'static> {
        let status = validation.map(|v| match field {
            MoveField::Type => FieldStatus::NotRequired,
            MoveField::Row | MoveField::Col => v.pos,
            MoveField::Direction => v.direction,
            MoveField::Split => v.split,
        });

        let mut value_style = match status {
            Some(FieldStatus::Valid) => Style::default()
                .bg(self.theme.field_valid_color)
                .fg(self.theme.text_fg_color),
            Some(FieldStatus::Invalid) => Style::default()
                .bg(self.theme.field_invalid_color)
                .fg(self.theme.text_fg_color),
            _ => Style::default(),
        };

        if field == self.move_form.focused() {
            value_style = value_style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }

        let prefix = if field == self.move_form.focused() {
            "> "
        } else {
            "  "
        };

        Spans::from(vec![
            Span::raw(format!("{}{: <10}", prefix, field.label())),
            Span::styled(format!(" {: <12}", self.move_form.field_text(field)), value_style),
        ])
    }

    fn message_paragraph(&self) -> Paragraph<'static> {
        let line = if let Some(err) = self.session.last_error() {
            Spans::from(Span::styled(
                err.to_string(),
                Style::default()
                    .fg(self.theme.error_message_fg)
                    .bg(self.theme.error_message_bg),
            ))
        } else if let Some(hint) = self.session.hint() {
            Spans::from(format!("Suggested move: {}", hint.describe()))
        } else {
            match self.session.state() {
                SessionState::AwaitingHumanMove(_) => {
                    Spans::from("tab field  ←/→ change  enter play  ? hint  r retry")
                }
                _ => Spans::from(""),
            }
        };

        Paragraph::new(vec![line]).block(Block::default().borders(Borders::ALL))
    }

    fn stack_paragraph(&self) -> Paragraph<'static> {
        let mut lines: Vec<Spans> = vec![];
        let mut title = "Stack".to_string();

        let scene = self.board_table.scene();
        let pos = self.move_form.coords().position(self.board_size());

        if let (Some(scene), Some(pos)) = (scene, pos) {
            title = format!("Stack at {}", pos);

            for placed in scene.stack_at(pos).iter().rev() {
                let kind = match placed.piece.kind {
                    PieceKind::Flat => "flat",
                    PieceKind::Wall => "wall",
                    PieceKind::Cap => "capstone",
                };

                lines.push(Spans::from(vec![
                    Span::styled(
                        format!(" {} ", self.theme.piece_char(&placed.piece)),
                        Style::default()
                            .bg(self.theme.board_bg_color)
                            .fg(self.theme.piece_color(placed.piece.color)),
                    ),
                    Span::raw(format!(" {} {}", placed.piece.color.name(), kind)),
                ]));
            }
        }

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title))
    }

    fn history_list(&self, height: u16) -> List<'static> {
        let lines = self.session.history().lines();
        let visible = height.saturating_sub(2) as usize;
        let skip = lines.len().saturating_sub(visible);

        let items: Vec<ListItem> = lines
            .iter()
            .skip(skip)
            .map(|line| ListItem::new(line.clone()))
            .collect();

        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Moves ({})", self.session.history().len())),
        )
    }
}

pub fn render_app(config: &AppConfig) -> Result<(), AppError> {
    let stdout = std::io::stdout()
        .into_raw_mode()
        .map_err(|_| AppError::terminal("Can't get stdout"))?;
    let stdout = AlternateScreen::from(stdout);
    let backend = TermionBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|_| AppError::terminal("Can't get terminal"))?;

    let theme = Theme::default();

    // Setup event handlers
    let events = Events::with_config(Config {
        tick_rate: config.tick_rate(),
    });

    let server = GameServer::new(&config.server.url, config.request_timeout())?;
    let dispatcher = Dispatcher::new(server, events.sender())?;

    info!("using game server at {}", &config.server.url);

    let mut app = App::new(config, &theme);

    loop {
        terminal
            .draw(|f| app.draw(f))
            .map_err(|_| AppError::terminal("Can't draw terminal"))?;

        let event = events
            .next()
            .map_err(|_| AppError::terminal("Can't get next event"))?;

        if !app.on_event(event, &dispatcher) {
            break;
        }
    }

    Ok(())
}
