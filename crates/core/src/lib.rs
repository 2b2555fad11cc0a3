#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Birthday Pairs memory game.
//!
//! This crate hosts the card models, deck generation, the flip/match
//! state machine, the timer queue that drives delayed flips, and the
//! configuration and invitation content used by the terminal UI.

pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod images;
pub mod itinerary;
pub mod models;
pub mod phase;
pub mod schedule;
pub mod session;
pub mod showcase;

pub use config::{AppConfig, BoardConfig, Timings};
pub use error::GameError;
pub use game::{Action, GameState, IgnoreReason, Outcome, Selection};
pub use itinerary::{Invitation, Itinerary};
pub use models::{Card, CardId, ImageRef};
pub use phase::Phase;
pub use session::{GameSession, GameStats};
