//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: endpoint host, status message, spinner
//! - `TurnBubble`: a single transcript turn
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: single-line message editor
//! - `TranscriptView`: scrollable transcript that follows the newest turn
//!
//! Components receive external data as props (struct fields) rather than
//! reaching into global state, which keeps them testable with
//! ratatui's `TestBackend`.

pub mod input_box;
pub mod message;
pub mod title_bar;
pub mod transcript;

pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub use message::TurnBubble;
pub use title_bar::TitleBar;
pub use transcript::{TranscriptState, TranscriptView};
