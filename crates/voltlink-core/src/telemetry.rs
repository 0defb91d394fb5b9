//! Vehicle telemetry snapshot as returned by the fleet API.
//!
//! Every sub-record and field is independently optional: the phrase composer
//! omits clauses for whatever is missing instead of failing, so the serde
//! model tolerates nulls and absent keys throughout.

use serde::{Deserialize, Serialize};

/// Point-in-time vehicle state. One snapshot per status query, immutable once read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleData {
    #[serde(default)]
    pub drive_state: Option<DriveState>,
    #[serde(default)]
    pub charge_state: Option<ChargeState>,
}

/// Drive-mode indicator. The wire value is a single letter (or null when the
/// car has never been shifted since waking); unknown values are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftState {
    Park,
    Drive,
    Reverse,
    Neutral,
    Other(String),
}

impl From<String> for ShiftState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "P" => Self::Park,
            "D" => Self::Drive,
            "R" => Self::Reverse,
            "N" => Self::Neutral,
            _ => Self::Other(raw),
        }
    }
}

impl From<ShiftState> for String {
    fn from(state: ShiftState) -> Self {
        match state {
            ShiftState::Park => "P".to_string(),
            ShiftState::Drive => "D".to_string(),
            ShiftState::Reverse => "R".to_string(),
            ShiftState::Neutral => "N".to_string(),
            ShiftState::Other(raw) => raw,
        }
    }
}

/// Charger/charging status. Unrecognized values keep their raw string so the
/// composer can still speak them ("Charging state is <value>.").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargingState {
    Charging,
    Complete,
    Disconnected,
    Stopped,
    Other(String),
}

impl ChargingState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Charging => "Charging",
            Self::Complete => "Complete",
            Self::Disconnected => "Disconnected",
            Self::Stopped => "Stopped",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ChargingState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Charging" => Self::Charging,
            "Complete" => Self::Complete,
            "Disconnected" => Self::Disconnected,
            "Stopped" => Self::Stopped,
            _ => Self::Other(raw),
        }
    }
}

impl From<ChargingState> for String {
    fn from(state: ChargingState) -> Self {
        state.as_str().to_string()
    }
}

/// Position, speed and heading. Present only when the car reports a GPS fix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveState {
    #[serde(default)]
    pub shift_state: Option<ShiftState>,
    /// Miles per hour; null when parked.
    #[serde(default)]
    pub speed: Option<u32>,
    /// Compass heading in degrees, 0-360.
    #[serde(default)]
    pub heading: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl DriveState {
    /// True when the car is actively in Drive.
    pub fn is_driving(&self) -> bool {
        self.shift_state == Some(ShiftState::Drive)
    }
}

/// Battery and charger status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargeState {
    #[serde(default)]
    pub charging_state: Option<ChargingState>,
    /// Estimated hours until full, fractional.
    #[serde(default)]
    pub time_to_full_charge: Option<f64>,
    #[serde(default)]
    pub fast_charger_present: bool,
    /// Rated range remaining, in miles.
    #[serde(default)]
    pub battery_range: Option<f64>,
}
