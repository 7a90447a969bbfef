use crossterm::event::KeyCode;
use tui::{
    style::{Color, Modifier, Style},
    text::{Span, Spans},
};

/// Which characters an input accepts.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputKind {
    Text,
    /// Digits and a decimal point.
    Decimal,
    /// Digits only.
    Integer,
}

/// A single-line text buffer.
#[derive(Clone, Debug)]
pub struct TextInput {
    pub value: String,
    pub kind: InputKind,
}

impl TextInput {
    pub fn new(kind: InputKind) -> Self {
        Self {
            value: String::new(),
            kind,
        }
    }

    pub fn with_value(kind: InputKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            InputKind::Text => !c.is_control(),
            InputKind::Decimal => c.is_ascii_digit() || (c == '.' && !self.value.contains('.')),
            InputKind::Integer => c.is_ascii_digit(),
        }
    }

    /// Applies an editing key. Returns false for keys it does not handle.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                if self.accepts(c) {
                    self.value.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Label and value, with a cursor when focused.
    pub fn spans(&self, label: &str, focused: bool) -> Spans<'static> {
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let value = if focused {
            format!("{}|", self.value)
        } else {
            self.value.clone()
        };

        Spans::from(vec![
            Span::styled(format!("{}: ", label), label_style),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
        ])
    }
}
