//! Opening showcase: the board is shown, then every card is turned over in
//! sequence before the player may click.

use std::time::Duration;

use crate::{config::Timings, game::Action, models::CardId};

/// Timed actions for the showcase, relative to the start of the game.
///
/// Card `i` turns over at `showcase_delay + i * reveal_stagger`; the flip
/// gate opens one stagger after the last card.
pub fn showcase_plan(
    cards: impl IntoIterator<Item = CardId>,
    timings: &Timings,
) -> Vec<(Duration, Action)> {
    let start = timings.showcase_delay();
    let stagger = timings.reveal_stagger();

    let mut plan: Vec<(Duration, Action)> = cards
        .into_iter()
        .enumerate()
        .map(|(idx, id)| (start + stagger * idx as u32, Action::Reveal(id)))
        .collect();
    let gate_at = start + stagger * plan.len() as u32;
    plan.push((gate_at, Action::OpenGate));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staggers_reveals_then_opens_gate() {
        let ids = [CardId(4), CardId(1), CardId(7)];
        let plan = showcase_plan(ids, &Timings::default());

        assert_eq!(
            plan,
            vec![
                (Duration::from_millis(1000), Action::Reveal(CardId(4))),
                (Duration::from_millis(1100), Action::Reveal(CardId(1))),
                (Duration::from_millis(1200), Action::Reveal(CardId(7))),
                (Duration::from_millis(1300), Action::OpenGate),
            ]
        );
    }

    #[test]
    fn empty_board_still_opens_gate() {
        let plan = showcase_plan(Vec::new(), &Timings::default());
        assert_eq!(plan, vec![(Duration::from_millis(1000), Action::OpenGate)]);
    }
}
