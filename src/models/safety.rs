use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SosStatus {
    Open,
    Acknowledged,
    Resolved,
}

/// An SOS alert raised from a vessel mid-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    pub id: String,
    pub trip_id: String,
    pub raised_by: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub status: SosStatus,
    pub created_at: DateTime<Utc>,
}

impl SosAlert {
    pub fn needs_attention(&self) -> bool {
        self.status != SosStatus::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_shape() {
        let json = r#"{
            "id": "sos-2",
            "tripId": "t-8",
            "raisedBy": "u-4",
            "message": "Engine failure near Itacoatiara",
            "latitude": -3.1432,
            "longitude": -58.4441,
            "status": "open",
            "createdAt": "2026-08-02T16:45:00Z"
        }"#;

        let alert: SosAlert = serde_json::from_str(json).expect("alert should parse");
        assert!(alert.needs_attention());
        assert!(alert.latitude.is_some());
    }

    #[test]
    fn resolved_alert_is_done() {
        let json = r#"{"id":"sos-1","tripId":"t-1","raisedBy":"u-1","status":"resolved","createdAt":"2026-01-01T00:00:00Z"}"#;
        let alert: SosAlert = serde_json::from_str(json).unwrap();
        assert!(!alert.needs_attention());
    }
}
