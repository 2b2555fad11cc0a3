//! Coarse game stage: playing the board, then the itinerary.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Stage of the invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// The board is in play.
    #[default]
    Playing,
    /// Every pair was found and the player moved on to the itinerary.
    Finished,
}

impl Phase {
    /// Handle the player's continue request.
    ///
    /// Leaving `Playing` requires every pair to be resolved. `Finished` is
    /// terminal and stays put.
    pub fn advance(self, all_resolved: bool) -> Result<Phase, GameError> {
        match self {
            Phase::Finished => Ok(Phase::Finished),
            Phase::Playing if all_resolved => Ok(Phase::Finished),
            Phase::Playing => Err(GameError::NotResolved),
        }
    }

    /// True once the itinerary is showing.
    pub fn is_finished(self) -> bool {
        self == Phase::Finished
    }
}
