//! Derived analytics over fetched records.
//!
//! The dashboard computes its charts client-side: records are already in
//! memory after an API fetch, so these are plain O(n) aggregations. The
//! server is never asked for aggregates.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Timelike};

use crate::models::{Booking, Trip};

/// Bookings per calendar day (UTC), sorted by date ascending.
pub fn bookings_per_day(bookings: &[Booking]) -> Vec<(NaiveDate, usize)> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for booking in bookings {
        *counts.entry(booking.created_at.date_naive()).or_default() += 1;
    }
    let mut days: Vec<_> = counts.into_iter().collect();
    days.sort_by_key(|&(date, _)| date);
    days
}

/// Bookings per weekday, indexed Monday = 0 through Sunday = 6.
pub fn bookings_by_weekday(bookings: &[Booking]) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for booking in bookings {
        counts[booking.created_at.weekday().num_days_from_monday() as usize] += 1;
    }
    counts
}

/// Bookings per hour of day (UTC), indexed 0 through 23.
pub fn bookings_by_hour(bookings: &[Booking]) -> [usize; 24] {
    let mut counts = [0usize; 24];
    for booking in bookings {
        counts[booking.created_at.hour() as usize] += 1;
    }
    counts
}

/// Period-over-period growth as a percentage.
/// `None` when the previous period had no data, since the ratio is
/// undefined rather than infinite growth.
pub fn growth_percent(current: usize, previous: usize) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let current = current as f64;
    let previous = previous as f64;
    Some((current - previous) / previous * 100.0)
}

/// Top `n` routes by booking count, descending; ties break by route
/// label so the ranking is stable. Bookings whose trip is unknown are
/// skipped.
pub fn top_routes(trips: &[Trip], bookings: &[Booking], n: usize) -> Vec<(String, usize)> {
    let routes: HashMap<&str, String> = trips
        .iter()
        .map(|trip| (trip.id.as_str(), trip.route()))
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for booking in bookings {
        if let Some(route) = routes.get(booking.trip_id.as_str()) {
            *counts.entry(route.clone()).or_default() += 1;
        }
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}
