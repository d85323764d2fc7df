use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatStatus {
    Active,
    Maintenance,
    Retired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boat {
    pub id: String,
    pub name: String,
    /// Passenger capacity in seats.
    pub capacity: u32,
    /// Cargo capacity in kilograms.
    #[serde(default)]
    pub cargo_capacity_kg: Option<u32>,
    pub status: BoatStatus,
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Body for boat create/update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoat {
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub cargo_capacity_kg: Option<u32>,
    pub status: BoatStatus,
}

impl Boat {
    pub fn is_operational(&self) -> bool {
        self.status == BoatStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_shape() {
        let json = r#"{
            "id": "b-41",
            "name": "Estrela do Rio",
            "capacity": 80,
            "cargoCapacityKg": 1200,
            "status": "active",
            "ownerId": "u-7"
        }"#;

        let boat: Boat = serde_json::from_str(json).expect("boat should parse");
        assert_eq!(boat.name, "Estrela do Rio");
        assert_eq!(boat.cargo_capacity_kg, Some(1200));
        assert!(boat.is_operational());
    }

    #[test]
    fn maintenance_boat_is_not_operational() {
        let json = r#"{"id":"b-1","name":"Anavilhanas","capacity":40,"status":"maintenance"}"#;
        let boat: Boat = serde_json::from_str(json).unwrap();
        assert!(!boat.is_operational());
        assert_eq!(boat.owner_id, None);
    }
}
