//! Domain errors raised by the game core.

use thiserror::Error;

use crate::models::{CardId, ImageRef};

/// Errors produced while dealing or playing a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Decks are built from pairs, so the card count must be even.
    #[error("card count must be even: 2, 4, 6, etc. but it is {0}")]
    OddCardCount(usize),
    /// The image pool cannot supply enough distinct pictures.
    #[error("deck needs {requested} distinct images but the pool only has {available}")]
    NotEnoughImages {
        /// Number of pairs asked for.
        requested: usize,
        /// Number of images in the pool.
        available: usize,
    },
    /// The image pool lists the same picture more than once.
    #[error("image pool lists {0} more than once")]
    DuplicateImage(ImageRef),
    /// An action referenced a card that is not on the board.
    #[error("no card with id {0} on the board")]
    UnknownCard(CardId),
    /// Continue was requested before every pair was found.
    #[error("cannot continue until every pair has been found")]
    NotResolved,
    /// Board dimensions that cannot produce a playable deck.
    #[error("invalid board {width}x{height}: need a non-zero, even number of cards")]
    InvalidBoard {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
}
