//! Response envelopes for list endpoints.
//!
//! Lists are wrapped in an object keyed by what they hold, so fields can be
//! added next to them later without breaking clients.

use serde::Serialize;

/// `{ "channels": [...] }`
#[derive(Debug, Serialize)]
pub struct ChannelsResponse<T: Serialize> {
    pub channels: Vec<T>,
}

/// `{ "people": [...] }`
#[derive(Debug, Serialize)]
pub struct PeopleResponse<T: Serialize> {
    pub people: Vec<T>,
}

/// `{ "items": [...] }`
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T: Serialize> {
    pub items: Vec<T>,
}
