use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::session::{Role, Turn, TurnState};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity above which a pending turn's border turns BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity above which a pending turn's border loses DIM.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

/// A single transcript turn rendered as a bordered bubble.
///
/// Transient: built fresh each frame by the transcript view. The border
/// title carries the speaker and the time the turn settled, so failed
/// requests show when they failed.
#[derive(Clone, Copy)]
pub struct TurnBubble<'a> {
    pub turn: &'a Turn,
    /// Current pulse intensity (0.0 to 1.0); only affects pending turns.
    pub pulse_intensity: f32,
}

impl<'a> TurnBubble<'a> {
    pub fn new(turn: &'a Turn, pulse_intensity: f32) -> Self {
        Self {
            turn,
            pulse_intensity,
        }
    }

    /// Height of the bubble at `width`, predicted with `textwrap` using the
    /// same options as ratatui's `Paragraph` wrapping.
    pub fn calculate_height(turn: &Turn, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = turn.text.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn label(&self) -> &'static str {
        match (self.turn.role, self.turn.state) {
            (Role::User, _) => "you",
            (Role::Model, TurnState::Error) => "error",
            (Role::Model, _) => "assistant",
        }
    }
}

/// Text style for a turn.
pub fn turn_style(turn: &Turn) -> Style {
    match (turn.role, turn.state) {
        (Role::User, _) => Style::default().fg(Color::Cyan),
        (Role::Model, TurnState::Pending(_)) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        (Role::Model, TurnState::Error) => Style::default().fg(Color::Red),
        (Role::Model, TurnState::Complete) => Style::default().fg(Color::Green),
    }
}

impl<'a> Widget for TurnBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = turn_style(self.turn);

        let mut border_style = style.add_modifier(Modifier::DIM);
        if self.turn.is_pending() {
            if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
                border_style = border_style
                    .remove_modifier(Modifier::DIM)
                    .add_modifier(Modifier::BOLD);
            } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
                border_style = border_style.remove_modifier(Modifier::DIM);
            }
        } else if self.turn.is_error() {
            border_style = border_style.remove_modifier(Modifier::DIM);
        }

        let title = format!(" {} {} ", self.label(), self.turn.at.format("%H:%M:%S"));

        let block = Block::bordered()
            .title(title)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.turn.text.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for TurnBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
