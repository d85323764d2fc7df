use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub trip_id: String,
    pub user_id: String,
    pub seats: u32,
    /// Total charged in centavos, after any coupon discount.
    pub total_cents: i64,
    #[serde(default)]
    pub coupon_code: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Revenue counts confirmed and completed bookings only.
    pub fn counts_as_revenue(&self) -> bool {
        matches!(self.status, BookingStatus::Confirmed | BookingStatus::Completed)
    }
}
