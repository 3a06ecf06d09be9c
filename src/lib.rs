// Library exports for the desktop app, the headless runner and integration tests

pub mod config;
pub mod episode;
pub mod events;
pub mod media;
pub mod player;
pub mod session;
pub mod time;

#[cfg(feature = "desktop")]
pub mod ui;

#[cfg(feature = "desktop")]
pub use ui::AppContext;
