use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppErrorKind {
    /// The server could not be reached, timed out or answered with an error status.
    Transport,
    /// The server answered but the body is not what the endpoint should return.
    MalformedResponse,
    /// The entered move parameters match none of the server's candidates.
    NoMatchingMove,
    InvalidInput,
    RequestInFlight,
    InvalidState,
    Config,
    Terminal,
}

impl AppErrorKind {
    pub fn name(&self) -> &str {
        match self {
            Self::Transport => "server unreachable",
            Self::MalformedResponse => "unexpected server response",
            Self::NoMatchingMove => "no matching move",
            Self::InvalidInput => "invalid input",
            Self::RequestInFlight => "busy",
            Self::InvalidState => "not allowed now",
            Self::Config => "config",
            Self::Terminal => "terminal",
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new<S: Into<String>>(kind: AppErrorKind, message: S) -> Self {
        AppError {
            kind,
            message: message.into(),
        }
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::Transport, message)
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::MalformedResponse, message)
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::InvalidInput, message)
    }

    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::InvalidState, message)
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::Config, message)
    }

    pub fn terminal<S: Into<String>>(message: S) -> Self {
        Self::new(AppErrorKind::Terminal, message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), &self.message)
    }
}

impl std::error::Error for AppError {}
