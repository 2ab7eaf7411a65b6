use crate::core::moves::Move;

/// Append-only record of the moves applied this session, numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    lines: Vec<String>,
}

impl MoveHistory {
    pub fn push(&mut self, mv: &Move) {
        let line = format!("{}. {}", self.lines.len() + 1, mv.describe());

        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
