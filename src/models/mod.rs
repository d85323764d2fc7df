//! Domain models for the NavegaJá platform.
//!
//! These mirror the JSON shapes the REST API returns (camelCase on the
//! wire). `New*` types are the request bodies for create operations.

pub mod boat;
pub mod booking;
pub mod coupon;
pub mod review;
pub mod safety;
pub mod shipment;
pub mod trip;
pub mod user;

pub use boat::{Boat, BoatStatus, NewBoat};
pub use booking::{Booking, BookingStatus};
pub use coupon::{Coupon, NewCoupon};
pub use review::{average_rating, Review};
pub use safety::{SosAlert, SosStatus};
pub use shipment::{Shipment, ShipmentStatus};
pub use trip::{NewTrip, Trip, TripStatus};
pub use user::{UserAccount, VerificationStatus};
