//! **Vehicle API** — telemetry fetch, wake-up, and command execution.
//!
//! Implement `VehicleApi` for a real fleet HTTP client or a canned placeholder.
//! `Ok(None)` from `vehicle_data` means the car is asleep or offline: an
//! expected, recoverable state, not a transport failure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{SkillError, SkillResult};
use crate::telemetry::VehicleData;

/// One controllable vehicle on the user's account.
pub trait VehicleApi: Send + Sync {
    /// Name shown to the user ("Red Five", etc.), spoken in every sentence.
    fn display_name(&self) -> &str;

    /// Fetch the current telemetry snapshot. `Ok(None)` = asleep/offline.
    fn vehicle_data(&self) -> SkillResult<Option<VehicleData>>;

    /// Ask the car to wake up. Fire-and-forget: completion is not awaited.
    fn wake_up(&self) -> SkillResult<()>;

    /// Run a named command (e.g. `door_lock`). `Ok(false)` means the car did
    /// not accept it, usually because it is asleep.
    fn command(&self, name: &str) -> SkillResult<bool>;
}

/// HTTP client for an owner-API-shaped vehicle fleet endpoint.
///
/// Endpoints: `GET /api/1/vehicles`, `GET /api/1/vehicles/{id}/vehicle_data`,
/// `POST /api/1/vehicles/{id}/wake_up`, `POST /api/1/vehicles/{id}/command/{name}`.
/// A 408 from the data endpoint means the vehicle is asleep.
pub struct FleetClient {
    client: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
    vehicle_id: u64,
    display_name: String,
}

impl FleetClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        vehicle_id: u64,
        display_name: impl Into<String>,
    ) -> SkillResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            vehicle_id,
            display_name: display_name.into(),
        })
    }

    /// List the vehicles on the account and build one client per car,
    /// preserving account order.
    pub fn list_vehicles(
        base_url: &str,
        access_token: &str,
    ) -> SkillResult<Vec<FleetClient>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        let url = format!("{}/api/1/vehicles", base_url.trim_end_matches('/'));
        let res = client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        if !res.status().is_success() {
            return Err(SkillError::VehicleApi(format!(
                "vehicle list failed with status {}",
                res.status()
            )));
        }
        let body: serde_json::Value = res
            .json()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        let entries = body
            .get("response")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut vehicles = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = match entry.get("id").and_then(|v| v.as_u64()) {
                Some(id) => id,
                None => {
                    warn!("vehicle list entry without id, skipping");
                    continue;
                }
            };
            let name = entry
                .get("display_name")
                .and_then(|v| v.as_str())
                .unwrap_or("Your car")
                .to_string();
            vehicles.push(FleetClient::new(base_url, access_token, id, name)?);
        }
        debug!(count = vehicles.len(), "fleet vehicle list fetched");
        Ok(vehicles)
    }

    fn vehicle_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/1/vehicles/{}/{}",
            self.base_url, self.vehicle_id, suffix
        )
    }
}

impl VehicleApi for FleetClient {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn vehicle_data(&self) -> SkillResult<Option<VehicleData>> {
        let res = self
            .client
            .get(self.vehicle_url("vehicle_data"))
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        if res.status() == reqwest::StatusCode::REQUEST_TIMEOUT {
            debug!(vehicle = %self.display_name, "vehicle asleep (408)");
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(SkillError::VehicleApi(format!(
                "vehicle_data failed with status {}",
                res.status()
            )));
        }
        let body: serde_json::Value = res
            .json()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        let data = match body.get("response") {
            Some(response) if !response.is_null() => {
                serde_json::from_value(response.clone())
                    .map_err(|e| SkillError::VehicleApi(e.to_string()))?
            }
            _ => return Ok(None),
        };
        Ok(Some(data))
    }

    fn wake_up(&self) -> SkillResult<()> {
        let res = self
            .client
            .post(self.vehicle_url("wake_up"))
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        debug!(vehicle = %self.display_name, status = %res.status(), "wake_up sent");
        Ok(())
    }

    fn command(&self, name: &str) -> SkillResult<bool> {
        let res = self
            .client
            .post(self.vehicle_url(&format!("command/{}", name)))
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        if res.status() == reqwest::StatusCode::REQUEST_TIMEOUT {
            return Ok(false);
        }
        if !res.status().is_success() {
            return Err(SkillError::VehicleApi(format!(
                "command {} failed with status {}",
                name,
                res.status()
            )));
        }
        let body: serde_json::Value = res
            .json()
            .map_err(|e| SkillError::VehicleApi(e.to_string()))?;
        Ok(body
            .pointer("/response/result")
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}

/// Placeholder vehicle: canned telemetry, no network. Use for running the
/// gateway without credentials and for exercising the phrase engine in tests.
#[derive(Debug, Default)]
pub struct PlaceholderVehicle {
    name: String,
    /// Snapshot returned by `vehicle_data`; `None` simulates a sleeping car.
    pub data: Option<VehicleData>,
    /// Result returned by `command`.
    pub command_accepted: bool,
    wake_calls: AtomicUsize,
    command_calls: AtomicUsize,
}

impl PlaceholderVehicle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_data(name: impl Into<String>, data: VehicleData) -> Self {
        Self {
            name: name.into(),
            data: Some(data),
            command_accepted: true,
            ..Self::default()
        }
    }

    /// How many times `wake_up` has been invoked.
    pub fn wake_calls(&self) -> usize {
        self.wake_calls.load(Ordering::SeqCst)
    }

    /// How many times `command` has been invoked.
    pub fn command_calls(&self) -> usize {
        self.command_calls.load(Ordering::SeqCst)
    }
}

impl VehicleApi for PlaceholderVehicle {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn vehicle_data(&self) -> SkillResult<Option<VehicleData>> {
        Ok(self.data.clone())
    }

    fn wake_up(&self) -> SkillResult<()> {
        self.wake_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn command(&self, _name: &str) -> SkillResult<bool> {
        self.command_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.command_accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_counts_wake_calls() {
        let car = PlaceholderVehicle::new("Test Car");
        assert_eq!(car.wake_calls(), 0);
        car.wake_up().unwrap();
        car.wake_up().unwrap();
        assert_eq!(car.wake_calls(), 2);
    }

    #[test]
    fn placeholder_without_data_reports_asleep() {
        let car = PlaceholderVehicle::new("Test Car");
        assert!(car.vehicle_data().unwrap().is_none());
    }
}
