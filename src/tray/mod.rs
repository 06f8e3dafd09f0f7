//! System tray presence: icon, title and the balance menu

mod app;
pub mod icon;

pub use app::{event_loop, publish, run, UserEvent};
