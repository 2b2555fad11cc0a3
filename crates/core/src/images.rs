//! Fixed, compiled-in picture pool used for card faces.

use crate::models::ImageRef;

/// Directory every card picture is served from.
pub const IMAGE_ROOT: &str = "static/images/cards/";

/// File names of the available card pictures.
pub const CARD_IMAGES: &[&str] = &[
    "balloons.jpg",
    "beach.jpg",
    "cake.jpg",
    "candles.jpg",
    "champagne.jpg",
    "cheese.jpg",
    "donuts.jpg",
    "figs.jpg",
    "sailboat.jpg",
    "sunrise.jpg",
    "sunset.jpg",
    "tennis.jpg",
];

/// Returns the full picture pool with the image root prefixed.
pub fn image_pool() -> Vec<ImageRef> {
    CARD_IMAGES
        .iter()
        .map(|file| ImageRef::new(format!("{IMAGE_ROOT}{file}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn pool_entries_are_distinct_and_rooted() {
        let pool = image_pool();
        assert_eq!(pool.len(), CARD_IMAGES.len());
        let unique: HashSet<_> = pool.iter().collect();
        assert_eq!(unique.len(), pool.len());
        assert!(pool.iter().all(|image| image.as_str().starts_with(IMAGE_ROOT)));
    }
}
