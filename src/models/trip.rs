use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    Boarding,
    InTransit,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub boat_id: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    #[serde(default)]
    pub arrival_at: Option<DateTime<Utc>>,
    /// Ticket price in centavos.
    pub price_cents: i64,
    pub seats_available: u32,
    pub status: TripStatus,
}

/// Body for trip create requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub boat_id: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub price_cents: i64,
}

impl Trip {
    /// Route label as shown in the dashboard, e.g. "Manaus → Parintins".
    pub fn route(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }

    pub fn is_sellable(&self) -> bool {
        self.status == TripStatus::Scheduled && self.seats_available > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(status: TripStatus, seats: u32) -> Trip {
        Trip {
            id: "t-1".into(),
            boat_id: "b-1".into(),
            origin: "Manaus".into(),
            destination: "Parintins".into(),
            departure_at: Utc::now(),
            arrival_at: None,
            price_cents: 12_000,
            seats_available: seats,
            status,
        }
    }

    #[test]
    fn route_label() {
        assert_eq!(trip(TripStatus::Scheduled, 10).route(), "Manaus → Parintins");
    }

    #[test]
    fn sellable_requires_seats_and_schedule() {
        assert!(trip(TripStatus::Scheduled, 1).is_sellable());
        assert!(!trip(TripStatus::Scheduled, 0).is_sellable());
        assert!(!trip(TripStatus::Cancelled, 10).is_sellable());
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&TripStatus::InTransit).unwrap(),
            r#""in_transit""#
        );
    }
}
