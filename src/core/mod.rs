//! Core data models for the balance monitor

mod balance;
mod display;
mod error;

pub use balance::*;
pub use display::*;
pub use error::*;
