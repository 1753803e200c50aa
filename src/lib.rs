//! Game engine for human-vs-computer Battleship.
//!
//! The crate holds the game logic only: fleet placement, shot resolution,
//! win detection and the computer's targeting. Rendering and transport are
//! left to callers, which read a [`GameSession`] and keep it in a
//! [`SessionStore`] between requests.

mod ai;
mod board;
mod common;
mod config;
mod game;
mod grid;
mod ledger;
mod logging;
mod ship;
mod store;

pub use ai::*;
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use grid::*;
pub use ledger::*;
pub use logging::init_logging;
pub use ship::*;
pub use store::*;
