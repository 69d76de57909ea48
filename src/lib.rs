//! Snake on a wrap-around grid, played in the terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;
pub mod ticker;

pub use error::{Error, Result};

pub type TermInt = u16;
