//! # Transcript View
//!
//! Scrollable projection of the chat session.
//!
//! ## Responsibilities
//!
//! - Render visible turns in order (the hidden context turn never appears)
//! - Follow the newest turn: every transcript change scrolls to the bottom
//! - Let the user scroll back through history between changes
//!
//! ## Follow Behavior
//!
//! The view compares the session's revision with the last one it rendered.
//! On a change it starts a follow animation that halves the distance to the
//! bottom each frame. User scrolling stops the animation but is not
//! remembered: the next change scrolls to the bottom again.
//!
//! `TranscriptView` is created each frame and borrows `TranscriptState`
//! (persistent) and the `ChatSession` (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::session::{ChatSession, Turn};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::TurnBubble;
use crate::tui::event::TuiEvent;

/// Scroll state for the transcript. Lives in `TuiState`.
pub struct TranscriptState {
    pub scroll_state: ScrollViewState,
    /// Session revision rendered last frame.
    seen_revision: Option<u64>,
    /// True while easing toward the bottom.
    following: bool,
    /// Total height of all bubbles, from the last render.
    pub content_height: u16,
    /// Viewport height, from the last render.
    pub viewport_height: u16,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            seen_revision: None,
            following: false,
            content_height: 0,
            viewport_height: 0,
        }
    }

    /// True while the follow animation still has distance to cover.
    pub fn is_animating(&self) -> bool {
        self.following
    }

    /// Largest valid scroll offset for the last rendered layout.
    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    fn set_offset(&mut self, y: u16) {
        self.scroll_state.set_offset(Position { x: 0, y });
    }

    /// Starts following when the session changed since the last frame.
    fn observe(&mut self, revision: u64) {
        if self.seen_revision != Some(revision) {
            self.seen_revision = Some(revision);
            self.following = true;
        }
    }

    /// Advances the follow animation by one frame, or clamps the offset.
    fn step(&mut self) {
        let max_y = self.max_offset();
        let y = self.offset();

        if !self.following {
            if y > max_y {
                self.set_offset(max_y);
            }
            return;
        }

        if y >= max_y {
            self.set_offset(max_y);
            self.following = false;
            return;
        }

        let remaining = max_y - y;
        let next = y + remaining.div_ceil(2);
        self.set_offset(next);
        if next >= max_y {
            self.following = false;
        }
    }
}

impl EventHandler for TranscriptState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.following = false;
                self.scroll_state.scroll_up();
            }
            TuiEvent::ScrollDown => {
                self.following = false;
                self.scroll_state.scroll_down();
            }
            TuiEvent::ScrollPageUp => {
                self.following = false;
                self.scroll_state.scroll_page_up();
            }
            TuiEvent::ScrollPageDown => {
                self.following = false;
                self.scroll_state.scroll_page_down();
            }
            _ => {}
        }
        None
    }
}

pub struct TranscriptView<'a> {
    pub state: &'a mut TranscriptState,
    pub session: &'a ChatSession,
    pub pulse_value: f32,
}

impl<'a> TranscriptView<'a> {
    pub fn new(state: &'a mut TranscriptState, session: &'a ChatSession, pulse_value: f32) -> Self {
        Self {
            state,
            session,
            pulse_value,
        }
    }
}

impl<'a> Component for TranscriptView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column

        let turns: Vec<&Turn> = self.session.visible_turns().collect();
        let heights: Vec<u16> = turns
            .iter()
            .map(|turn| TurnBubble::calculate_height(turn, content_width))
            .collect();
        let total_height = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        self.state.observe(self.session.revision());
        self.state.step();

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (turn, height) in turns.iter().zip(&heights) {
            let rect = Rect::new(0, y_offset, content_width, *height);
            scroll_view.render_widget(TurnBubble::new(turn, self.pulse_value), rect);
            y_offset = y_offset.saturating_add(*height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
