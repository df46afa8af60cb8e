//! # InputBox Component
//!
//! Single-line message editor.
//!
//! The buffer and cursor are internal state. `busy` is a prop from the app:
//! while a reply is outstanding, Enter keeps the text instead of submitting,
//! so nothing typed is lost. Pasted newlines are flattened to spaces.
//! Long input scrolls horizontally to keep the cursor in view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Rows used by the input box (border + one line + border)
pub const INPUT_HEIGHT: u16 = 3;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// True while a reply is outstanding (Prop)
    pub busy: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset of the character boundary before `pos`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            busy: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display columns hidden to the left so the cursor fits in `inner_width`.
    fn horizontal_scroll(&self, inner_width: u16) -> usize {
        let cursor_col = self.buffer[..self.cursor].width();
        let room = (inner_width as usize).saturating_sub(1);
        cursor_col.saturating_sub(room)
    }

    /// The slice of the buffer visible after skipping `skip` columns.
    fn visible_text(&self, skip: usize) -> &str {
        let mut col = 0;
        for (i, c) in self.buffer.char_indices() {
            if col >= skip {
                return &self.buffer[i..];
            }
            col += c.width().unwrap_or(0);
        }
        ""
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        if text.is_empty() {
            return None;
        }
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let skip = self.horizontal_scroll(inner_width);

        let (title, border_style) = if self.busy {
            (
                " Waiting for a reply... ",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (
                " Message (Enter send, Ctrl+N new chat, Esc quit) ",
                Style::default().fg(Color::Green),
            )
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style.add_modifier(Modifier::DIM))
            .title(title);

        let input = Paragraph::new(self.visible_text(skip))
            .block(block)
            .style(Style::default().fg(Color::White));
        frame.render_widget(input, area);

        let cursor_col = self.buffer[..self.cursor].width().saturating_sub(skip) as u16;
        let x = area.x + 1 + cursor_col.min(inner_width.saturating_sub(1));
        frame.set_cursor_position((x, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let c = if *c == '\n' { ' ' } else { *c };
                let mut utf8 = [0u8; 4];
                let text: &str = c.encode_utf8(&mut utf8);
                self.insert(text)
            }
            TuiEvent::Paste(text) => self.insert(&flatten_newlines(text)),
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if self.busy || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
