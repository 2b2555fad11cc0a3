//! Deck generation: pick distinct pictures, pair them up, shuffle.

use std::collections::HashSet;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::debug;

use crate::{
    error::GameError,
    models::{Card, CardId, ImageRef},
};

/// RNG used for dealing. A seed makes the deal reproducible.
pub fn deck_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Deal `count` cards from `pool`.
///
/// The pool must not repeat a picture. Picks `count / 2` distinct pictures
/// without replacement, creates two cards with their own ids for each, and
/// returns them shuffled. Every card starts with its picture showing and
/// clickable.
pub fn generate_deck<R: Rng + ?Sized>(
    count: usize,
    pool: &[ImageRef],
    rng: &mut R,
) -> Result<Vec<Card>, GameError> {
    if count % 2 != 0 {
        return Err(GameError::OddCardCount(count));
    }
    let mut seen = HashSet::with_capacity(pool.len());
    if let Some(duplicate) = pool.iter().find(|image| !seen.insert(*image)) {
        return Err(GameError::DuplicateImage(duplicate.clone()));
    }
    let pairs = count / 2;
    if pairs > pool.len() {
        return Err(GameError::NotEnoughImages {
            requested: pairs,
            available: pool.len(),
        });
    }

    let mut cards = Vec::with_capacity(count);
    let mut next_id = 0u32;
    for image in pool.choose_multiple(rng, pairs) {
        for _ in 0..2 {
            cards.push(Card::new(CardId(next_id), image.clone()));
            next_id += 1;
        }
    }
    cards.shuffle(rng);

    debug!(cards = cards.len(), pairs, "Deck generated");
    Ok(cards)
}
