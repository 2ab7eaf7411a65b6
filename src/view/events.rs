use crate::core::dispatcher::ServerEvent;
use log::warn;
use std::sync::mpsc;
use std::time::Duration;
use std::{io, thread};
use termion::event::Key;
use termion::input::TermRead;

pub enum Event<I> {
    Input(I),
    Tick,
    Server(ServerEvent),
}

impl<I> From<ServerEvent> for Event<I> {
    fn from(event: ServerEvent) -> Self {
        Event::Server(event)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventSideEffect {
    None,
    QuitApp,
    Submit,
    RequestHint,
    Retry,
    NewGame,
}

pub trait EventHandler<I> {
    fn on_event(&mut self, event: Event<I>) -> EventSideEffect;
}

/// Wraps termion input, ticks and server replies. Input and ticks are each
/// produced on their own thread; server replies arrive through [`Events::sender`].
/// Everything ends up on one `Receiver`.
pub struct Events {
    tx: mpsc::Sender<Event<Key>>,
    rx: mpsc::Receiver<Event<Key>>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate: Duration::from_millis(250),
        }
    }
}

impl Events {
    pub fn with_config(config: Config) -> Events {
        let (tx, rx) = mpsc::channel();
        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                for key in stdin.keys().flatten() {
                    if let Err(err) = tx.send(Event::Input(key)) {
                        warn!("input thread stopped: {}", err);
                        return;
                    }
                }
            })
        };
        let tick_handle = {
            let tx = tx.clone();
            thread::spawn(move || loop {
                if let Err(err) = tx.send(Event::Tick) {
                    warn!("tick thread stopped: {}", err);
                    break;
                }
                thread::sleep(config.tick_rate);
            })
        };
        Events {
            tx,
            rx,
            _input_handle: input_handle,
            _tick_handle: tick_handle,
        }
    }

    pub fn sender(&self) -> mpsc::Sender<Event<Key>> {
        self.tx.clone()
    }

    pub fn next(&self) -> Result<Event<Key>, mpsc::RecvError> {
        self.rx.recv()
    }
}
