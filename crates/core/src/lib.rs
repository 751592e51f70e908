//! Domain logic for the celebration service.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! repository layer, the worker and the HTTP API alike.

pub mod calendar;
pub mod channel_settings;
pub mod error;
pub mod messages;
pub mod messaging;
pub mod occurrence;
pub mod person;
pub mod profile_input;
pub mod render;
pub mod signature;
pub mod types;
