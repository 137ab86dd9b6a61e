use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Broadcast state of a sports event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Live,
    Highlights,
    Upcoming,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [
        EventStatus::Live,
        EventStatus::Upcoming,
        EventStatus::Highlights,
    ];

    /// Rank in the merged listing: live first, then upcoming, then highlights
    pub fn priority(self) -> u8 {
        match self {
            EventStatus::Live => 1,
            EventStatus::Upcoming => 2,
            EventStatus::Highlights => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Live => "Live",
            EventStatus::Highlights => "Highlights",
            EventStatus::Upcoming => "Upcoming",
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Live" => Ok(EventStatus::Live),
            "Highlights" => Ok(EventStatus::Highlights),
            "Upcoming" => Ok(EventStatus::Upcoming),
            other => Err(format!("unknown event status: {}", other)),
        }
    }
}

/// A sports event card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SportsEvent {
    pub id: Uuid,
    pub title: String,
    pub sport: String,
    pub status: EventStatus,
    pub teams: Vec<String>,
    pub venue: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub image: String,
    pub description: Option<String>,
}

impl SportsEvent {
    /// Natural key used for upserts
    pub fn natural_key(&self) -> (&str, Option<DateTime<Utc>>) {
        (&self.title, self.start_time)
    }
}

/// Orders events live, upcoming, highlights. The sort is stable so events
/// sharing a status keep their input order.
pub fn sort_by_status_priority(events: &mut [SportsEvent]) {
    events.sort_by_key(|event| event.status.priority());
}
