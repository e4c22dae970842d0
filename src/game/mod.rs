//! Pickup-game lifecycle, RSVPs and per-player game views.

pub mod query;
pub mod registry;
pub mod rsvp;

use chrono::{NaiveDate, Utc};

/// Calendar date used for "upcoming" filters (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
