use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A UI component that renders into a `Rect` of the frame.
///
/// Components receive their data as struct fields ("props") and may borrow
/// persistent state mutably, so `render` takes `&mut self`: the transcript
/// view advances its scroll animation during the render pass.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The higher-level event this component emits, if any.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
