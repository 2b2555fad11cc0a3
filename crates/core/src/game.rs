//! Flip/match state machine.
//!
//! All board mutation goes through [`GameState::apply`], which takes one
//! [`Action`] and reports what happened as an [`Outcome`]. Timing lives
//! outside: callers schedule the `Reveal`/`Hide`/`OpenGate` actions that the
//! showcase and mismatch handling produce.

use tracing::{debug, info};

use crate::{
    error::GameError,
    models::{Card, CardId},
    phase::Phase,
};

/// Something that can happen to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The player clicked a card.
    Click(CardId),
    /// Showcase turns a card over to its back.
    Reveal(CardId),
    /// A mismatched card is turned back over after its delay.
    Hide(CardId),
    /// Allow the player to interact with the board.
    OpenGate,
    /// The player asked to move on to the itinerary.
    Continue,
}

/// Why a click or a delayed hide had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The global flip gate is closed.
    GateClosed,
    /// The card was already matched.
    CardLocked,
    /// The card is already one of the pending selections.
    AlreadySelected,
    /// The board has been left for the itinerary.
    Finished,
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The click or hide was ignored.
    Ignored(IgnoreReason),
    /// The card became the first selection.
    Selected(CardId),
    /// The two selections share a picture and are now locked.
    Matched {
        /// First selected card.
        first: CardId,
        /// Second selected card.
        second: CardId,
        /// No card is left turned over.
        all_resolved: bool,
    },
    /// The two selections differ; the caller must schedule their hides.
    Mismatched {
        /// First selected card.
        first: CardId,
        /// Second selected card.
        second: CardId,
    },
    /// A card was turned over to its back.
    TurnedOver(CardId),
    /// The flip gate is open.
    GateOpened,
    /// The phase changed (or stayed) after a continue request.
    Phase(Phase),
}

/// Pending selection between actions.
///
/// A second selection is compared inside the same [`GameState::apply`]
/// call, so at most one card is ever waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected.
    Idle,
    /// One card selected, waiting for its partner.
    One(CardId),
}

/// Full board state for one game.
#[derive(Debug, Clone)]
pub struct GameState {
    cards: Vec<Card>,
    first: Option<CardId>,
    second: Option<CardId>,
    can_flip: bool,
    phase: Phase,
    all_resolved: bool,
    attempts: usize,
    mismatches: usize,
}

impl GameState {
    /// Start a game on the given deck with the flip gate closed.
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            first: None,
            second: None,
            can_flip: false,
            phase: Phase::Playing,
            all_resolved: false,
            attempts: 0,
            mismatches: 0,
        }
    }

    /// Apply one action to the board.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, GameError> {
        let outcome = match action {
            Action::Click(id) => self.click(id)?,
            Action::Reveal(id) => {
                self.card_mut(id)?.is_flipped = true;
                Outcome::TurnedOver(id)
            }
            Action::Hide(id) => self.hide(id)?,
            Action::OpenGate => {
                self.can_flip = true;
                info!("Flip gate opened");
                Outcome::GateOpened
            }
            Action::Continue => {
                let next = self.phase.advance(self.all_resolved)?;
                if next != self.phase {
                    info!(attempts = self.attempts, "All pairs found; showing itinerary");
                    self.phase = next;
                    self.cards.clear();
                    self.first = None;
                    self.second = None;
                    self.can_flip = false;
                }
                Outcome::Phase(next)
            }
        };
        debug!(?action, ?outcome, "Action applied");
        Ok(outcome)
    }

    fn click(&mut self, id: CardId) -> Result<Outcome, GameError> {
        if self.phase.is_finished() {
            return Ok(Outcome::Ignored(IgnoreReason::Finished));
        }
        let card = self.card(id).ok_or(GameError::UnknownCard(id))?;
        if !self.can_flip {
            return Ok(Outcome::Ignored(IgnoreReason::GateClosed));
        }
        if !card.can_flip {
            return Ok(Outcome::Ignored(IgnoreReason::CardLocked));
        }
        if self.first == Some(id) || self.second == Some(id) {
            return Ok(Outcome::Ignored(IgnoreReason::AlreadySelected));
        }

        self.card_mut(id)?.is_flipped = false;
        match self.first {
            None => {
                self.first = Some(id);
                Ok(Outcome::Selected(id))
            }
            Some(first) => {
                self.second = Some(id);
                self.resolve(first, id)
            }
        }
    }

    /// A hide scheduled by a mismatch may land after the player already
    /// picked the card again or matched it; those cards keep their picture.
    fn hide(&mut self, id: CardId) -> Result<Outcome, GameError> {
        let selected = self.first == Some(id) || self.second == Some(id);
        let card = self.card_mut(id)?;
        if !card.can_flip {
            return Ok(Outcome::Ignored(IgnoreReason::CardLocked));
        }
        if selected {
            return Ok(Outcome::Ignored(IgnoreReason::AlreadySelected));
        }
        card.is_flipped = true;
        Ok(Outcome::TurnedOver(id))
    }

    fn resolve(&mut self, first: CardId, second: CardId) -> Result<Outcome, GameError> {
        self.attempts += 1;
        let same_picture = {
            let a = self.card(first).ok_or(GameError::UnknownCard(first))?;
            let b = self.card(second).ok_or(GameError::UnknownCard(second))?;
            a.image == b.image
        };

        let outcome = if same_picture {
            for id in [first, second] {
                let card = self.card_mut(id)?;
                card.can_flip = false;
                card.is_flipped = false;
            }
            if self.cards.iter().all(Card::is_matched) {
                self.all_resolved = true;
            }
            info!(%first, %second, all_resolved = self.all_resolved, "Pair found");
            Outcome::Matched {
                first,
                second,
                all_resolved: self.all_resolved,
            }
        } else {
            self.mismatches += 1;
            Outcome::Mismatched { first, second }
        };

        self.first = None;
        self.second = None;
        Ok(outcome)
    }

    /// All cards in board order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card by id.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    fn card_mut(&mut self, id: CardId) -> Result<&mut Card, GameError> {
        self.cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or(GameError::UnknownCard(id))
    }

    /// Current selection slots.
    pub fn selection(&self) -> Selection {
        match self.first {
            Some(first) => Selection::One(first),
            None => Selection::Idle,
        }
    }

    /// Global flip gate.
    pub fn can_flip(&self) -> bool {
        self.can_flip
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every pair has been found and continue is allowed.
    pub fn all_resolved(&self) -> bool {
        self.all_resolved
    }

    /// Number of matched pairs.
    pub fn pairs_found(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched()).count() / 2
    }

    /// Number of pairs dealt.
    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    /// Comparisons made so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Comparisons that did not match.
    pub fn mismatches(&self) -> usize {
        self.mismatches
    }
}
