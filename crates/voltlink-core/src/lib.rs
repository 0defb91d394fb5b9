//! # voltlink-core — voice-assistant core for a personal electric vehicle
//!
//! Turns a telemetry snapshot plus reverse-geocoded location context into
//! spoken status sentences, and carries the provider traits the skills layer
//! is built on.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                       Status query                            │
//! │  ┌─────────────┐   ┌───────────────────┐   ┌──────────────┐  │
//! │  │ VehicleApi  │ → │ Location Resolver │ → │    Phrase    │  │
//! │  │ (telemetry) │   │ (travel time +    │   │   Composer   │  │
//! │  └─────────────┘   │  reverse geocode) │   │ (sentences)  │  │
//! │                    └───────────────────┘   └──────────────┘  │
//! │                             ↑                                 │
//! │                      GeoProvider (maps backend)               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! One snapshot per query, no caching, no retries: degraded provider data
//! drops clauses from the output instead of failing the request.

pub mod config;
pub mod error;
pub mod geo;
pub mod phrases;
pub mod telemetry;
pub mod vehicle;

pub use config::AssistantConfig;
pub use error::{SkillError, SkillResult};
pub use geo::{
    component, resolve_place, travel_time_seconds, AddressComponent, GeoProvider,
    GoogleMapsGeo, Place, ReferenceAddress, StaticGeo,
};
pub use phrases::{
    heading_phrase, hours_and_minutes_phrase, hours_or_minutes_phrase, location_phrase,
    place_phrase, sleeping_phrase, status_phrase, AT_HOME, HOME_RADIUS_SECS,
};
pub use telemetry::{ChargeState, ChargingState, DriveState, ShiftState, VehicleData};
pub use vehicle::{FleetClient, PlaceholderVehicle, VehicleApi};
