//! A running game: board state plus the timer queue that drives it.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    config::{AppConfig, BoardConfig, Timings},
    deck::{deck_rng, generate_deck},
    error::GameError,
    game::{Action, GameState, Outcome},
    images::image_pool,
    models::{Card, CardId},
    phase::Phase,
    schedule::Schedule,
    showcase::showcase_plan,
};

/// Score summary for the status line and the itinerary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStats {
    /// Pairs matched so far.
    pub pairs_found: usize,
    /// Pairs on the board.
    pub total_pairs: usize,
    /// Comparisons made.
    pub attempts: usize,
    /// Comparisons that missed.
    pub mismatches: usize,
}

/// One game from deal to itinerary.
///
/// `now` arguments are offsets from the moment the session was created.
/// Dropping the session cancels every pending timer.
#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    schedule: Schedule<Action>,
    timings: Timings,
    final_stats: Option<GameStats>,
}

impl GameSession {
    /// Deal a board from the configuration, seeding the RNG from `config.seed`.
    pub fn from_config(config: &AppConfig) -> Result<Self, GameError> {
        let mut rng = deck_rng(config.seed);
        Self::deal(&config.board, config.timings, &mut rng)
    }

    /// Deal `width * height` cards from the built-in image pool.
    pub fn deal<R: Rng + ?Sized>(
        board: &BoardConfig,
        timings: Timings,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let cards = generate_deck(board.total_cards(), &image_pool(), rng)?;
        info!(
            width = board.width,
            height = board.height,
            cards = cards.len(),
            "New game dealt"
        );
        Ok(Self::with_cards(cards, timings))
    }

    /// Start a session on an existing deck and queue the showcase.
    pub fn with_cards(cards: Vec<Card>, timings: Timings) -> Self {
        let mut schedule = Schedule::new();
        for (due, action) in showcase_plan(cards.iter().map(|card| card.id), &timings) {
            schedule.push_at(due, action);
        }
        Self {
            state: GameState::new(cards),
            schedule,
            timings,
            final_stats: None,
        }
    }

    /// Forward a player click and queue hides for a mismatch.
    pub fn click(&mut self, id: CardId, now: Duration) -> Result<Outcome, GameError> {
        let outcome = self.state.apply(Action::Click(id))?;
        if let Outcome::Mismatched { first, second } = outcome {
            self.schedule
                .push_after(now, self.timings.mismatch_first(), Action::Hide(first));
            self.schedule
                .push_after(now, self.timings.mismatch_second(), Action::Hide(second));
            debug!(%first, %second, "Mismatch; hides scheduled");
        }
        Ok(outcome)
    }

    /// Apply every queued action that is due at `now`.
    ///
    /// Every due action is attempted even when an earlier one fails; the
    /// first failure is returned after the rest have run.
    pub fn tick(&mut self, now: Duration) -> Result<usize, GameError> {
        let mut applied = 0;
        let mut first_error = None;
        for action in self.schedule.drain_due(now) {
            match self.state.apply(action) {
                Ok(_) => applied += 1,
                Err(err) => {
                    warn!(?action, %err, "Scheduled action failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    /// Move on to the itinerary once every pair is found.
    ///
    /// Pending timers are cancelled and the board is discarded.
    pub fn continue_to_itinerary(&mut self) -> Result<Phase, GameError> {
        if self.state.phase().is_finished() {
            return Ok(Phase::Finished);
        }
        let stats = self.stats();
        match self.state.apply(Action::Continue)? {
            Outcome::Phase(phase) => {
                self.schedule.cancel_all();
                self.final_stats = Some(stats);
                Ok(phase)
            }
            _ => Ok(self.state.phase()),
        }
    }

    /// Cancel every pending timer.
    pub fn teardown(&mut self) -> usize {
        self.schedule.cancel_all()
    }

    /// Board state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Number of timers still queued.
    pub fn pending_timers(&self) -> usize {
        self.schedule.len()
    }

    /// Session clock time of the next queued action.
    pub fn next_timer(&self) -> Option<Duration> {
        self.schedule.next_due()
    }

    /// Score so far, or the final score once the board is gone.
    pub fn stats(&self) -> GameStats {
        if let Some(stats) = self.final_stats {
            return stats;
        }
        GameStats {
            pairs_found: self.state.pairs_found(),
            total_pairs: self.state.total_pairs(),
            attempts: self.state.attempts(),
            mismatches: self.state.mismatches(),
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        deck::deck_rng,
        game::IgnoreReason,
        models::ImageRef,
    };

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// ids 0/2 show "a", ids 1/3 show "b".
    fn small_session() -> GameSession {
        let cards = ["a", "b", "a", "b"]
            .iter()
            .enumerate()
            .map(|(idx, image)| Card::new(CardId(idx as u32), ImageRef::new(*image)))
            .collect();
        GameSession::with_cards(cards, Timings::default())
    }

    /// Run the showcase to completion.
    fn ready_session() -> GameSession {
        let mut session = small_session();
        assert_eq!(session.tick(ms(1400)).unwrap(), 5);
        session
    }

    fn flipped(session: &GameSession, id: u32) -> bool {
        session.state().card(CardId(id)).unwrap().is_flipped
    }

    #[test]
    fn showcase_turns_cards_over_then_opens_gate() {
        let mut session = small_session();
        assert_eq!(session.pending_timers(), 5);
        assert!(session.state().cards().iter().all(Card::shows_picture));

        assert_eq!(
            session.click(CardId(0), ms(0)).unwrap(),
            Outcome::Ignored(IgnoreReason::GateClosed)
        );

        assert_eq!(session.tick(ms(999)).unwrap(), 0);
        assert_eq!(session.tick(ms(1100)).unwrap(), 2);
        assert!(flipped(&session, 0));
        assert!(flipped(&session, 1));
        assert!(!flipped(&session, 2));
        assert!(!session.state().can_flip());

        assert_eq!(session.tick(ms(1400)).unwrap(), 3);
        assert!(session.state().cards().iter().all(|card| card.is_flipped));
        assert!(session.state().can_flip());
        assert_eq!(session.pending_timers(), 0);
    }

    #[test]
    fn mismatch_hides_after_staggered_delays() {
        let mut session = ready_session();
        let now = ms(5000);
        session.click(CardId(0), now).unwrap();
        assert_eq!(
            session.click(CardId(1), now).unwrap(),
            Outcome::Mismatched {
                first: CardId(0),
                second: CardId(1),
            }
        );
        assert_eq!(session.next_timer(), Some(ms(6000)));

        session.tick(ms(5999)).unwrap();
        assert!(!flipped(&session, 0));
        assert!(!flipped(&session, 1));

        session.tick(ms(6000)).unwrap();
        assert!(flipped(&session, 0));
        assert!(!flipped(&session, 1));

        session.tick(ms(6200)).unwrap();
        assert!(flipped(&session, 1));
        assert!(session.state().cards().iter().all(|card| card.can_flip));
        assert_eq!(session.stats().mismatches, 1);
    }

    #[test]
    fn match_locks_immediately_and_unlocks_continue() {
        let mut session = ready_session();
        assert!(session.continue_to_itinerary().is_err());

        session.click(CardId(0), ms(2000)).unwrap();
        session.click(CardId(2), ms(2000)).unwrap();
        assert!(session.state().card(CardId(0)).unwrap().is_matched());
        assert!(session.state().card(CardId(2)).unwrap().is_matched());
        assert_eq!(session.pending_timers(), 0);

        session.click(CardId(1), ms(2100)).unwrap();
        let outcome = session.click(CardId(3), ms(2100)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Matched {
                first: CardId(1),
                second: CardId(3),
                all_resolved: true,
            }
        );

        assert_eq!(session.continue_to_itinerary().unwrap(), Phase::Finished);
        assert!(session.state().cards().is_empty());
        assert_eq!(
            session.stats(),
            GameStats {
                pairs_found: 2,
                total_pairs: 2,
                attempts: 2,
                mismatches: 0,
            }
        );
        assert_eq!(session.continue_to_itinerary().unwrap(), Phase::Finished);
    }

    #[test]
    fn rematch_during_hide_delay_still_finishes() {
        let mut session = ready_session();
        session.click(CardId(0), ms(5000)).unwrap();
        session.click(CardId(1), ms(5000)).unwrap();
        session.click(CardId(0), ms(5100)).unwrap();
        assert!(matches!(
            session.click(CardId(2), ms(5100)).unwrap(),
            Outcome::Matched { .. }
        ));

        assert_eq!(session.tick(ms(6300)).unwrap(), 2);
        let card = session.state().card(CardId(0)).unwrap();
        assert!(card.is_matched());
        assert!(card.shows_picture());
        assert!(flipped(&session, 1));

        session.click(CardId(1), ms(7000)).unwrap();
        assert_eq!(
            session.click(CardId(3), ms(7000)).unwrap(),
            Outcome::Matched {
                first: CardId(1),
                second: CardId(3),
                all_resolved: true,
            }
        );
        assert_eq!(session.continue_to_itinerary().unwrap(), Phase::Finished);
    }

    #[test]
    fn quick_match_with_hides_pending_does_not_finish_early() {
        let mut session = ready_session();
        for (a, b) in [(0, 1), (2, 3), (0, 2)] {
            session.click(CardId(a), ms(5000)).unwrap();
            session.click(CardId(b), ms(5050)).unwrap();
        }

        assert!(!session.state().all_resolved());
        assert_eq!(
            session.continue_to_itinerary(),
            Err(GameError::NotResolved)
        );
        assert_eq!(session.phase(), Phase::Playing);

        session.tick(ms(6300)).unwrap();
        assert!(flipped(&session, 1));
        assert!(flipped(&session, 3));
        assert!(!flipped(&session, 0));
        assert!(!flipped(&session, 2));
    }

    #[test]
    fn failing_timer_does_not_drop_later_ones() {
        let mut session = small_session();
        session.schedule.push_at(ms(500), Action::Hide(CardId(42)));

        assert_eq!(
            session.tick(ms(1400)),
            Err(GameError::UnknownCard(CardId(42)))
        );
        assert_eq!(session.pending_timers(), 0);
        assert!(session.state().can_flip());
        assert!(session.state().cards().iter().all(|card| card.is_flipped));
    }

    #[test]
    fn teardown_cancels_showcase() {
        let mut session = small_session();
        assert_eq!(session.teardown(), 5);
        assert_eq!(session.tick(ms(10_000)).unwrap(), 0);
        assert!(!session.state().can_flip());
    }

    #[test]
    fn dealing_uses_board_size() {
        let board = BoardConfig {
            width: 3,
            height: 2,
        };
        let session = GameSession::deal(&board, Timings::default(), &mut deck_rng(Some(5)))
            .expect("deals");
        assert_eq!(session.state().cards().len(), 6);
        assert_eq!(session.stats().total_pairs, 3);
    }

    #[test]
    fn odd_board_fails_to_deal() {
        let board = BoardConfig {
            width: 3,
            height: 3,
        };
        assert_eq!(
            GameSession::deal(&board, Timings::default(), &mut deck_rng(Some(5))).err(),
            Some(GameError::OddCardCount(9))
        );
    }
}
