//! Library surface for the binary and for headless integration tests.

pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod drafts;
pub mod editor;
pub mod history;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod theme;
pub mod ui;
pub mod util;

pub use app::{App, Screen};
pub use config::Config;
pub use session::{Phase, Session, TickOutcome};
