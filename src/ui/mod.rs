//! Desktop GUI built on iced.

mod app;
mod commands;
mod components;
mod error_map;
mod messages;
mod screens;
mod telemetry;

pub use app::{AppFlags, MiniApp, Runtime};
pub use telemetry::UiTelemetry;

use iced::{Application, Settings, Size};

/// Runs the GUI until the window closes.
pub fn launch(flags: AppFlags) -> iced::Result {
    let mut settings = Settings::with_flags(flags);
    settings.window.size = Size::new(480.0, 720.0);
    MiniApp::run(settings)
}
