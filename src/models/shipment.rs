use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Registered,
    InTransit,
    Delivered,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    #[serde(default)]
    pub trip_id: Option<String>,
    pub sender_id: String,
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    /// Declared value in centavos.
    #[serde(default)]
    pub declared_value_cents: Option<i64>,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    pub fn is_open(&self) -> bool {
        matches!(self.status, ShipmentStatus::Registered | ShipmentStatus::InTransit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_shape() {
        let json = r#"{
            "id": "s-5",
            "tripId": "t-2",
            "senderId": "u-3",
            "origin": "Santarém",
            "destination": "Óbidos",
            "weightKg": 35.5,
            "declaredValueCents": 50000,
            "status": "in_transit",
            "createdAt": "2026-07-01T08:00:00Z"
        }"#;

        let shipment: Shipment = serde_json::from_str(json).expect("shipment should parse");
        assert_eq!(shipment.weight_kg, 35.5);
        assert!(shipment.is_open());
    }

    #[test]
    fn delivered_is_closed() {
        let json = r#"{"id":"s-1","senderId":"u-1","origin":"A","destination":"B","weightKg":1.0,"status":"delivered","createdAt":"2026-01-01T00:00:00Z"}"#;
        let shipment: Shipment = serde_json::from_str(json).unwrap();
        assert!(!shipment.is_open());
        assert_eq!(shipment.trip_id, None);
    }
}
