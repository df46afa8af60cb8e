//! # TitleBar Component
//!
//! One-line status bar: endpoint host, status message and, while a reply is
//! outstanding, a spinner. Stateless; all fields are props from the app.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct TitleBar {
    /// Endpoint host (never the full URL)
    pub endpoint_label: String,
    pub status_message: String,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(
        endpoint_label: String,
        status_message: String,
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            endpoint_label,
            status_message,
            is_loading,
            spinner_frame,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Medichat", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" ({})", self.endpoint_label)),
        ];
        if self.is_loading {
            let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            spans.push(Span::styled(
                format!(" {spinner}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
