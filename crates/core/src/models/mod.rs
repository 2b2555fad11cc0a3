//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single card, unique within one deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Path of the picture shown on a card's face.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an image path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Borrow the raw path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without directory or extension, used as a short label.
    pub fn label(&self) -> &str {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        file.split_once('.').map(|(stem, _)| stem).unwrap_or(file)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tile on the board.
///
/// `is_flipped` means the card is turned over to its back. A freshly dealt
/// card shows its picture; the opening showcase turns every card over and
/// clicks turn them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,
    /// Picture shared with exactly one other card.
    pub image: ImageRef,
    /// Card is turned over to its back.
    pub is_flipped: bool,
    /// Card may still be clicked.
    pub can_flip: bool,
}

impl Card {
    /// A freshly dealt card: picture showing and clickable.
    pub fn new(id: CardId, image: ImageRef) -> Self {
        Self {
            id,
            image,
            is_flipped: false,
            can_flip: true,
        }
    }

    /// True while the picture side is visible.
    pub fn shows_picture(&self) -> bool {
        !self.is_flipped
    }

    /// True once the card has been matched and locked.
    pub fn is_matched(&self) -> bool {
        !self.can_flip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_label_strips_directory_and_extension() {
        let image = ImageRef::new("static/images/cards/sunset.jpg");
        assert_eq!(image.label(), "sunset");
        assert_eq!(ImageRef::new("plain").label(), "plain");
    }

    #[test]
    fn new_card_shows_picture_and_is_clickable() {
        let card = Card::new(CardId(3), ImageRef::new("a.jpg"));
        assert!(card.shows_picture());
        assert!(!card.is_matched());
        assert_eq!(card.id.to_string(), "#3");
    }
}
