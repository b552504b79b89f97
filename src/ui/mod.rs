//! Terminal front end: a [`ViewHost`](crate::router::ViewHost) drawn with
//! ratatui and driven by crossterm key events.

mod app;
mod draw;
mod forms;
mod helpers;
mod host;
mod terminal;

pub use app::App;
pub use host::TerminalHost;
pub use terminal::run_app;
