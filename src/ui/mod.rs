pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::AbsherApp;
pub use state::{AppState, LoginForm, RecordingState};
pub use theme::Theme;
