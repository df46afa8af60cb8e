use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{INPUT_HEIGHT, TitleBar, TranscriptView};

/// Splits the frame into title, transcript and input areas.
pub fn layout(area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let [title_area, transcript_area, input_area] = layout(frame.area());

    TitleBar::new(
        app.endpoint_label.clone(),
        app.status_message.clone(),
        app.is_loading(),
        spinner_frame,
    )
    .render(frame, title_area);

    TranscriptView::new(&mut tui.transcript, &app.session, tui.pulse_value)
        .render(frame, transcript_area);

    tui.input_box.busy = app.is_loading();
    tui.input_box.render(frame, input_area);
}
