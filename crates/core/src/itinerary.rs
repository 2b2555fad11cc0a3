//! Invitation text and the weekend itinerary shown after the game.
//!
//! The content is compiled in from `assets/itinerary.json`.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const BUILTIN_JSON: &str = include_str!("../assets/itinerary.json");

/// Everything the invitation displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Text shown above the board.
    pub intro: GameIntro,
    /// Content of the finished screen.
    pub itinerary: Itinerary,
}

/// Heading and instructions shown while playing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameIntro {
    /// Page heading.
    pub title: String,
    /// One-line instructions.
    pub prompt: String,
    /// Text printed on the back of every card.
    pub card_back: String,
}

/// The weekend plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    /// Event name.
    pub title: String,
    /// Date of the birthday itself.
    pub event_date: NaiveDate,
    /// Heading above the day list.
    pub heading: String,
    /// Days in display order.
    pub days: Vec<ItineraryDay>,
    /// Links to photos of the venue.
    #[serde(default)]
    pub photos: Vec<String>,
}

/// One day of the itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// Weekday name.
    pub label: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Planned activities.
    pub entries: Vec<ItineraryEntry>,
}

/// A single planned activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryEntry {
    /// Start time.
    pub time: NaiveTime,
    /// Description.
    pub label: String,
    /// Booking or info link.
    #[serde(default)]
    pub link: Option<String>,
}

impl Invitation {
    /// Parse the compiled-in content.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_JSON).context("failed to parse built-in itinerary")
    }

    /// Parse invitation content from JSON, sorting each day's entries by time.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut invitation: Invitation =
            serde_json::from_str(raw).context("invalid invitation JSON")?;
        for day in &mut invitation.itinerary.days {
            day.entries.sort_by_key(|entry| entry.time);
        }
        Ok(invitation)
    }
}

impl Itinerary {
    /// Event date as `dd / mm / yyyy`.
    pub fn display_date(&self) -> String {
        self.event_date.format("%d / %m / %Y").to_string()
    }
}

impl ItineraryDay {
    /// Heading such as `Thursday, November 19`.
    pub fn heading(&self) -> String {
        format!("{}, {}", self.label, self.date.format("%B %-d"))
    }
}

impl ItineraryEntry {
    /// Start time as `hh:mm AM`.
    pub fn display_time(&self) -> String {
        self.time.format("%I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_parses() -> Result<()> {
        let invitation = Invitation::builtin()?;
        assert_eq!(invitation.intro.card_back, "30");

        let itinerary = invitation.itinerary;
        assert_eq!(itinerary.display_date(), "03 / 11 / 2020");
        assert_eq!(itinerary.days.len(), 3);
        assert_eq!(itinerary.days[0].heading(), "Thursday, November 19");
        assert_eq!(itinerary.days[0].entries[0].display_time(), "11:00 AM");
        assert_eq!(itinerary.days[0].entries[3].display_time(), "07:40 PM");
        assert!(itinerary.days[0].entries[1].link.is_some());
        assert_eq!(itinerary.photos.len(), 3);
        Ok(())
    }

    #[test]
    fn entries_are_sorted_by_time() -> Result<()> {
        let raw = r#"{
            "intro": { "title": "t", "prompt": "p", "card_back": "30" },
            "itinerary": {
                "title": "t",
                "event_date": "2020-11-03",
                "heading": "h",
                "days": [{
                    "label": "Friday",
                    "date": "2020-11-20",
                    "entries": [
                        { "time": "13:00:00", "label": "late" },
                        { "time": "08:00:00", "label": "early" }
                    ]
                }]
            }
        }"#;
        let invitation = Invitation::from_json(raw)?;
        let labels: Vec<_> = invitation.itinerary.days[0]
            .entries
            .iter()
            .map(|entry| entry.label.as_str())
            .collect();
        assert_eq!(labels, vec!["early", "late"]);
        assert!(invitation.itinerary.photos.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_content_is_rejected() {
        assert!(Invitation::from_json("{\"intro\": {}}").is_err());
    }
}
