use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{sort_by_status_priority, EventStatus, SportsEvent},
};

/// Source of sports event cards
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Events with the given status in source order, or every event ordered
    /// live, upcoming, highlights when `status` is `None`
    async fn events(&self, status: Option<EventStatus>) -> AppResult<Vec<SportsEvent>>;

    fn name(&self) -> &'static str;
}

/// Fixed in-memory event table
///
/// Start times are computed relative to construction and do not move
/// afterwards, so `(title, start_time)` stays a stable upsert key for the
/// lifetime of the process.
pub struct MockEventProvider {
    events: Vec<SportsEvent>,
}

impl MockEventProvider {
    pub fn new() -> Self {
        Self::with_events(default_events(Utc::now()))
    }

    pub fn with_events(events: Vec<SportsEvent>) -> Self {
        Self { events }
    }

    /// Events with `status`, keeping table order
    pub fn by_status(&self, status: EventStatus) -> Vec<SportsEvent> {
        self.events
            .iter()
            .filter(|event| event.status == status)
            .cloned()
            .collect()
    }

    /// Every event, live first, then upcoming, then highlights
    pub fn merged(&self) -> Vec<SportsEvent> {
        let mut events = self.events.clone();
        sort_by_status_priority(&mut events);
        events
    }
}

impl Default for MockEventProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EventSource for MockEventProvider {
    async fn events(&self, status: Option<EventStatus>) -> AppResult<Vec<SportsEvent>> {
        Ok(match status {
            Some(status) => self.by_status(status),
            None => self.merged(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[allow(clippy::too_many_arguments)]
fn event(
    title: &str,
    sport: &str,
    status: EventStatus,
    teams: [&str; 2],
    venue: &str,
    start_time: DateTime<Utc>,
    image: &str,
    description: &str,
) -> SportsEvent {
    SportsEvent {
        id: Uuid::new_v4(),
        title: title.to_string(),
        sport: sport.to_string(),
        status,
        teams: teams.iter().map(|t| t.to_string()).collect(),
        venue: Some(venue.to_string()),
        start_time: Some(start_time),
        image: image.to_string(),
        description: Some(description.to_string()),
    }
}

fn default_events(now: DateTime<Utc>) -> Vec<SportsEvent> {
    vec![
        event(
            "India vs Australia Live Cricket",
            "Cricket",
            EventStatus::Live,
            ["India", "Australia"],
            "Melbourne Cricket Ground",
            now,
            "https://images.unsplash.com/photo-1512719994953-eabf50895df7?w=400&h=300&fit=crop",
            "Live cricket match - Border-Gavaskar Trophy. Watch the thrilling encounter between India and Australia.",
        ),
        event(
            "Premier League Highlights: Man City vs Liverpool",
            "Football",
            EventStatus::Highlights,
            ["Manchester City", "Liverpool"],
            "Etihad Stadium",
            now - Duration::hours(2),
            "https://images.unsplash.com/photo-1700319021396-95aec8e168ac?w=400&h=300&fit=crop",
            "Best moments from Manchester City vs Liverpool - Premier League clash with goals and key highlights.",
        ),
        event(
            "NBA Finals: Lakers vs Celtics Game 7",
            "Basketball",
            EventStatus::Upcoming,
            ["Los Angeles Lakers", "Boston Celtics"],
            "Crypto.com Arena",
            now + Duration::hours(8),
            "https://images.unsplash.com/photo-1745163112810-ab65646732ba?w=400&h=300&fit=crop",
            "The ultimate showdown on basketball's biggest stage. Don't miss this epic Game 7.",
        ),
        event(
            "Cricket World Cup Final",
            "Cricket",
            EventStatus::Upcoming,
            ["England", "New Zealand"],
            "Lords Cricket Ground",
            now + Duration::days(2),
            "https://images.unsplash.com/photo-1593341646782-e0b495cff86d?w=400&h=300&fit=crop",
            "The biggest cricket match of the year. Don't miss the thrilling finale of the Cricket World Cup.",
        ),
        event(
            "Champions League Final Highlights",
            "Football",
            EventStatus::Highlights,
            ["Real Madrid", "Barcelona"],
            "Santiago Bernabéu",
            now - Duration::days(1),
            "https://images.pexels.com/photos/33944536/pexels-photo-33944536.jpeg?auto=compress&cs=tinysrgb&w=400&h=300&fit=crop",
            "El Clasico in the Champions League final - relive the best moments from this historic match.",
        ),
        event(
            "Tennis Wimbledon Live",
            "Tennis",
            EventStatus::Live,
            ["Novak Djokovic", "Carlos Alcaraz"],
            "All England Club",
            now - Duration::minutes(30),
            "https://images.unsplash.com/photo-1554068865-24cecd4e34b8?w=400&h=300&fit=crop",
            "Live from Wimbledon - the epic final match between two tennis legends.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(title: &str, status: EventStatus) -> SportsEvent {
        SportsEvent {
            id: Uuid::new_v4(),
            title: title.to_string(),
            sport: "Cricket".to_string(),
            status,
            teams: Vec::new(),
            venue: None,
            start_time: None,
            image: String::new(),
            description: None,
        }
    }

    fn titles(events: &[SportsEvent]) -> Vec<&str> {
        events.iter().map(|e| e.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_merged_listing_orders_live_upcoming_highlights() {
        let provider = MockEventProvider::with_events(vec![
            fixture("A", EventStatus::Live),
            fixture("B", EventStatus::Highlights),
            fixture("C", EventStatus::Upcoming),
        ]);

        let events = provider.events(None).await.unwrap();
        assert_eq!(titles(&events), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_merged_listing_is_stable_within_status() {
        let provider = MockEventProvider::with_events(vec![
            fixture("H1", EventStatus::Highlights),
            fixture("U1", EventStatus::Upcoming),
            fixture("L1", EventStatus::Live),
            fixture("H2", EventStatus::Highlights),
            fixture("U2", EventStatus::Upcoming),
            fixture("L2", EventStatus::Live),
        ]);

        assert_eq!(
            titles(&provider.merged()),
            vec!["L1", "L2", "U1", "U2", "H1", "H2"]
        );
    }

    #[tokio::test]
    async fn test_filter_by_status_keeps_table_order() {
        let provider = MockEventProvider::new();

        let live = provider.events(Some(EventStatus::Live)).await.unwrap();
        assert_eq!(
            titles(&live),
            vec!["India vs Australia Live Cricket", "Tennis Wimbledon Live"]
        );

        let highlights = provider
            .events(Some(EventStatus::Highlights))
            .await
            .unwrap();
        assert_eq!(highlights.len(), 2);
        assert!(highlights
            .iter()
            .all(|e| e.status == EventStatus::Highlights));
    }

    #[test]
    fn test_default_table_has_every_status() {
        let provider = MockEventProvider::new();
        for status in EventStatus::ALL {
            assert_eq!(provider.by_status(status).len(), 2);
        }
        assert_eq!(provider.merged().len(), 6);
    }
}
