//! Terminal front end: configuration, logging, the message loop and rendering.
mod app;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
