mod app;
mod config;
mod effects;
mod flush;
pub mod logging;
mod ui;

pub use app::run_app;
pub use config::ClientConfig;
