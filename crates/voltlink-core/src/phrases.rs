//! **Status Phrase Composer** — turn a telemetry snapshot into spoken sentences.
//!
//! A deterministic decision tree over drive state, charge state, speed,
//! heading and proximity to home. Missing data drops clauses, never the whole
//! sentence. Numeric and address content is wrapped in speech-markup spans
//! (`<say-as interpret-as="unit">`, `<say-as interpret-as="address">`) for the
//! downstream speech renderer; this module produces annotated text only.

use tracing::debug;

use crate::error::SkillResult;
use crate::geo::{resolve_place, travel_time_seconds, GeoProvider, Place, ReferenceAddress};
use crate::telemetry::ChargingState;
use crate::vehicle::VehicleApi;

/// Literal phrase for a car within `HOME_RADIUS_SECS` of the reference address.
pub const AT_HOME: &str = "at home";

/// Travel times at or under this many seconds count as being home.
pub const HOME_RADIUS_SECS: u64 = 60;

fn unit_markup(text: &str) -> String {
    format!("<say-as interpret-as=\"unit\">{}</say-as>", text)
}

fn address_markup(text: &str) -> String {
    format!("<say-as interpret-as=\"address\">{}</say-as>", text)
}

/// 8-point compass name for a heading in degrees. Bucket thresholds are
/// exclusive below (22.5 is already northeast); 337.5-360 wraps to north.
pub fn heading_phrase(heading: f64) -> &'static str {
    const BUCKETS: [(f64, &str); 8] = [
        (22.5, "north"),
        (67.5, "northeast"),
        (112.5, "east"),
        (157.5, "southeast"),
        (202.5, "south"),
        (247.5, "southwest"),
        (292.5, "west"),
        (337.5, "northwest"),
    ];
    for (limit, name) in BUCKETS {
        if heading < limit {
            return name;
        }
    }
    "north"
}

/// Travel-time phrase: "1h and 30min", "2h", or "5min", each number in unit
/// markup. Floor division; zero seconds comes out as "0min".
pub fn hours_and_minutes_phrase(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 && minutes > 0 {
        format!(
            "{} and {}",
            unit_markup(&format!("{}h", hours)),
            unit_markup(&format!("{}min", minutes))
        )
    } else if hours > 0 {
        unit_markup(&format!("{}h", hours))
    } else {
        unit_markup(&format!("{}min", minutes))
    }
}

/// Charge-completion phrase: single unit, rounded. Above one hour the value
/// rounds to whole hours; at or below, only the fractional minutes are
/// spoken — so exactly 1.0 hours yields "0min". That boundary matches the
/// shipped speech output and stays as-is.
pub fn hours_or_minutes_phrase(hours_decimal: f64) -> String {
    if hours_decimal > 1.0 {
        unit_markup(&format!("{}h", hours_decimal.round() as i64))
    } else {
        let minutes = (hours_decimal.fract() * 60.0).round() as i64;
        unit_markup(&format!("{}min", minutes))
    }
}

/// Format a resolved place as a spoken sub-clause: "on <street> in <city[, ST]>".
///
/// The city stands alone when its state matches `local_region` (saying "Palo
/// Alto, CA" to someone who lives in CA is redundant); any other state is
/// appended. `None` when the place has no speakable segments — distinct from
/// "nothing resolved", which the caller handles before getting here.
pub fn place_phrase(place: &Place, local_region: &str) -> Option<String> {
    let mut segments = Vec::new();

    if let Some(street) = &place.street {
        segments.push(address_markup(street));
    }
    if let Some(city) = &place.city {
        let spoken = match &place.state {
            Some(state) if state != local_region => format!("{}, {}", city, state),
            _ => city.clone(),
        };
        segments.push(address_markup(&spoken));
    }

    if segments.is_empty() {
        None
    } else {
        Some(format!("on {}", segments.join(" in ")))
    }
}

/// Resolve coordinates into a spoken location phrase.
///
/// Order matters: travel time to the reference address is checked first, and
/// a result within `HOME_RADIUS_SECS` returns the literal "at home" without
/// ever invoking place resolution — no geocoding call, and home is never
/// described by its address. Otherwise the place phrase is produced, with a
/// "<time> away" prefix when travel time is known.
pub fn location_phrase(
    geo: &dyn GeoProvider,
    lat: f64,
    lon: f64,
    home: Option<&ReferenceAddress>,
    local_region: &str,
) -> SkillResult<Option<String>> {
    let travel_time = match home {
        Some(home) => travel_time_seconds(geo, lat, lon, home)?,
        None => None,
    };

    if let Some(secs) = travel_time {
        if secs <= HOME_RADIUS_SECS {
            return Ok(Some(AT_HOME.to_string()));
        }
    }

    let place = match resolve_place(geo, lat, lon)? {
        Some(place) => place,
        None => return Ok(None),
    };
    let place_phr = match place_phrase(&place, local_region) {
        Some(phr) => phr,
        None => {
            debug!(lat, lon, "place resolved but has no speakable segments");
            return Ok(None);
        }
    };

    Ok(Some(match travel_time {
        Some(secs) => format!("{} away {}", hours_and_minutes_phrase(secs), place_phr),
        None => place_phr,
    }))
}

/// Compose the full spoken status report for one vehicle.
///
/// Unavailable telemetry (asleep/offline) triggers the wake-up side effect
/// and a fixed apology sentence — the single recoverable path. Everything
/// else walks the drive/charge decision tree and always closes with the
/// available-range sentence when the range is known.
pub fn status_phrase(
    car: &dyn VehicleApi,
    geo: &dyn GeoProvider,
    home: Option<&ReferenceAddress>,
    local_region: &str,
) -> SkillResult<String> {
    let data = match car.vehicle_data()? {
        Some(data) => data,
        None => {
            car.wake_up()?;
            return Ok(sleeping_phrase(car.display_name()));
        }
    };

    let name = car.display_name();

    let location = match &data.drive_state {
        Some(drive) => {
            location_phrase(geo, drive.latitude, drive.longitude, home, local_region)?
        }
        None => None,
    };

    let mut sentences = Vec::new();

    let driving = data
        .drive_state
        .as_ref()
        .filter(|drive| drive.is_driving());

    if let Some(drive) = driving {
        match drive.speed {
            Some(speed) if speed > 0 => {
                let heading = heading_phrase(drive.heading);
                sentences.push(match &location {
                    Some(loc) => format!(
                        "{} is {}, heading {} at {} miles per hour.",
                        name, loc, heading, speed
                    ),
                    None => format!(
                        "{} is heading {} at {} miles per hour.",
                        name, heading, speed
                    ),
                });
            }
            _ => {
                sentences.push(match &location {
                    Some(loc) => format!("{} is stopped {}.", name, loc),
                    None => format!("{} is stopped.", name),
                });
            }
        }
    } else {
        let charge = data.charge_state.as_ref();
        // Location clause applies only when known and away from home.
        let away = location.as_deref().filter(|loc| *loc != AT_HOME);

        match charge.and_then(|c| c.charging_state.as_ref()) {
            Some(ChargingState::Charging) => {
                let time_left = hours_or_minutes_phrase(
                    charge.and_then(|c| c.time_to_full_charge).unwrap_or(0.0),
                );
                let verb = if charge.map(|c| c.fast_charger_present).unwrap_or(false) {
                    "supercharging"
                } else {
                    "charging"
                };
                sentences.push(match away {
                    Some(loc) => format!(
                        "{} is {} and {} with {} to go.",
                        name, loc, verb, time_left
                    ),
                    None => format!("{} is {} with {} to go.", name, verb, time_left),
                });
            }
            Some(ChargingState::Complete) => {
                sentences.push(match away {
                    Some(loc) => format!("{} is {} and done charging.", name, loc),
                    None => format!("{} is done charging.", name),
                });
            }
            Some(ChargingState::Disconnected) => {
                sentences.push(if location.as_deref() == Some(AT_HOME) {
                    format!("{} is unplugged.", name)
                } else if let Some(loc) = &location {
                    format!("{} is parked {}.", name, loc)
                } else {
                    format!("{} is parked.", name)
                });
            }
            Some(ChargingState::Stopped) => {
                sentences.push(match away {
                    Some(loc) => format!(
                        "{} is plugged in and ready to charge {}.",
                        name, loc
                    ),
                    None => format!("{} is plugged in and ready to charge.", name),
                });
            }
            Some(other) => {
                sentences.push(match &location {
                    Some(loc) => format!("Charging state is {} {}.", other.as_str(), loc),
                    None => format!("Charging state is {}.", other.as_str()),
                });
            }
            // No charging state at all: say what little is known.
            None => {
                sentences.push(match &location {
                    Some(loc) => format!("{} is parked {}.", name, loc),
                    None => format!("{} is parked.", name),
                });
            }
        }
    }

    if let Some(range) = data.charge_state.as_ref().and_then(|c| c.battery_range) {
        sentences.push(format!("Available range is {} miles.", range as i64));
    }

    Ok(sentences.join(" "))
}

/// Apology sentence for a car that had to be woken up first.
pub fn sleeping_phrase(name: &str) -> String {
    format!("{} was sleeping. Wait a moment and try again.", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{component, StaticGeo};
    use crate::telemetry::{ChargeState, DriveState, ShiftState, VehicleData};
    use crate::vehicle::PlaceholderVehicle;

    const UNIT_OPEN: &str = "<say-as interpret-as=\"unit\">";
    const ADDR_OPEN: &str = "<say-as interpret-as=\"address\">";
    const CLOSE: &str = "</say-as>";

    fn home() -> ReferenceAddress {
        ReferenceAddress {
            street_line: Some("1 Main St".to_string()),
            city: Some("Palo Alto".to_string()),
            region: Some("CA".to_string()),
        }
    }

    fn driving_state(speed: Option<u32>, heading: f64) -> DriveState {
        DriveState {
            shift_state: Some(ShiftState::Drive),
            speed,
            heading,
            latitude: 37.44,
            longitude: -122.16,
        }
    }

    fn charge(state: ChargingState, range: f64) -> ChargeState {
        ChargeState {
            charging_state: Some(state),
            time_to_full_charge: Some(0.0),
            fast_charger_present: false,
            battery_range: Some(range),
        }
    }

    // --- heading buckets -------------------------------------------------

    #[test]
    fn heading_buckets() {
        assert_eq!(heading_phrase(0.0), "north");
        assert_eq!(heading_phrase(359.0), "north");
        assert_eq!(heading_phrase(90.0), "east");
        assert_eq!(heading_phrase(180.0), "south");
        assert_eq!(heading_phrase(270.0), "west");
        // Threshold values belong to the next bucket.
        assert_eq!(heading_phrase(22.5), "northeast");
        assert_eq!(heading_phrase(337.5), "north");
        assert_eq!(heading_phrase(360.0), "north");
    }

    // --- time formatting -------------------------------------------------

    #[test]
    fn hours_and_minutes_both_units() {
        assert_eq!(
            hours_and_minutes_phrase(5400),
            format!("{}1h{} and {}30min{}", UNIT_OPEN, CLOSE, UNIT_OPEN, CLOSE)
        );
    }

    #[test]
    fn hours_and_minutes_minutes_only() {
        assert_eq!(
            hours_and_minutes_phrase(120),
            format!("{}2min{}", UNIT_OPEN, CLOSE)
        );
    }

    #[test]
    fn hours_and_minutes_hours_only() {
        assert_eq!(
            hours_and_minutes_phrase(7200),
            format!("{}2h{}", UNIT_OPEN, CLOSE)
        );
    }

    #[test]
    fn hours_or_minutes_rounds_whole_hours() {
        assert_eq!(
            hours_or_minutes_phrase(1.5),
            format!("{}2h{}", UNIT_OPEN, CLOSE)
        );
    }

    #[test]
    fn hours_or_minutes_fractional_hour() {
        assert_eq!(
            hours_or_minutes_phrase(0.5),
            format!("{}30min{}", UNIT_OPEN, CLOSE)
        );
    }

    #[test]
    fn hours_or_minutes_exactly_one_hour_boundary() {
        // Exactly 1.0 falls into the minutes branch with no fractional part.
        // Shipped wording; kept as-is.
        assert_eq!(
            hours_or_minutes_phrase(1.0),
            format!("{}0min{}", UNIT_OPEN, CLOSE)
        );
    }

    // --- place phrase ----------------------------------------------------

    #[test]
    fn place_phrase_local_region_drops_state() {
        let place = Place {
            city: Some("Palo Alto".to_string()),
            state: Some("CA".to_string()),
            ..Place::default()
        };
        assert_eq!(
            place_phrase(&place, "CA").unwrap(),
            format!("on {}Palo Alto{}", ADDR_OPEN, CLOSE)
        );
    }

    #[test]
    fn place_phrase_other_region_keeps_state() {
        let place = Place {
            city: Some("Reno".to_string()),
            state: Some("NV".to_string()),
            ..Place::default()
        };
        assert_eq!(
            place_phrase(&place, "CA").unwrap(),
            format!("on {}Reno, NV{}", ADDR_OPEN, CLOSE)
        );
    }

    #[test]
    fn place_phrase_street_and_city() {
        let place = Place {
            street: Some("Homer Ave".to_string()),
            city: Some("Palo Alto".to_string()),
            state: Some("CA".to_string()),
            ..Place::default()
        };
        assert_eq!(
            place_phrase(&place, "CA").unwrap(),
            format!(
                "on {}Homer Ave{} in {}Palo Alto{}",
                ADDR_OPEN, CLOSE, ADDR_OPEN, CLOSE
            )
        );
    }

    #[test]
    fn place_phrase_without_segments_is_none() {
        let place = Place {
            street_number: Some("233".to_string()),
            ..Place::default()
        };
        assert!(place_phrase(&place, "CA").is_none());
    }

    // --- location phrase -------------------------------------------------

    #[test]
    fn at_home_short_circuit_skips_geocoding() {
        let geo = StaticGeo::new()
            .with_duration(45)
            .with_components(vec![component("Palo Alto", "Palo Alto", &["locality"])]);
        let home = home();
        let phrase = location_phrase(&geo, 37.44, -122.16, Some(&home), "CA").unwrap();
        assert_eq!(phrase.as_deref(), Some(AT_HOME));
        assert_eq!(geo.geocode_calls(), 0);
        assert_eq!(geo.duration_calls(), 1);
    }

    #[test]
    fn no_reference_address_means_no_routing_call() {
        let geo = StaticGeo::new()
            .with_duration(45)
            .with_components(vec![component("Palo Alto", "Palo Alto", &["locality"])]);
        let phrase = location_phrase(&geo, 37.44, -122.16, None, "CA").unwrap();
        assert_eq!(
            phrase.unwrap(),
            format!("on {}Palo Alto{}", ADDR_OPEN, CLOSE)
        );
        assert_eq!(geo.duration_calls(), 0);
    }

    #[test]
    fn travel_time_prefixes_place_phrase() {
        let geo = StaticGeo::new()
            .with_duration(5400)
            .with_components(vec![component("Reno", "Reno", &["locality"])]);
        let home = home();
        let phrase = location_phrase(&geo, 39.52, -119.81, Some(&home), "CA")
            .unwrap()
            .unwrap();
        assert_eq!(
            phrase,
            format!(
                "{}1h{} and {}30min{} away on {}Reno{}",
                UNIT_OPEN, CLOSE, UNIT_OPEN, CLOSE, ADDR_OPEN, CLOSE
            )
        );
    }

    #[test]
    fn unknown_place_is_unknown_location() {
        let geo = StaticGeo::new().with_duration(5400);
        let home = home();
        assert!(location_phrase(&geo, 0.0, 0.0, Some(&home), "CA")
            .unwrap()
            .is_none());
    }

    // --- status phrase ---------------------------------------------------

    #[test]
    fn driving_with_unknown_location_omits_location_clause() {
        let data = VehicleData {
            drive_state: Some(driving_state(Some(35), 10.0)),
            charge_state: Some(charge(ChargingState::Disconnected, 142.7)),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new();
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert_eq!(
            phrase,
            "Red Five is heading north at 35 miles per hour. Available range is 142 miles."
        );
    }

    #[test]
    fn driving_with_known_location_includes_clause() {
        let data = VehicleData {
            drive_state: Some(driving_state(Some(62), 90.0)),
            charge_state: Some(charge(ChargingState::Disconnected, 200.0)),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new()
            .with_components(vec![component("Reno", "Reno", &["locality"])]);
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert_eq!(
            phrase,
            format!(
                "Red Five is on {}Reno{}, heading east at 62 miles per hour. \
                 Available range is 200 miles.",
                ADDR_OPEN, CLOSE
            )
        );
    }

    #[test]
    fn zero_speed_never_emits_heading() {
        for speed in [None, Some(0)] {
            let data = VehicleData {
                drive_state: Some(driving_state(speed, 90.0)),
                charge_state: Some(charge(ChargingState::Disconnected, 100.0)),
            };
            let car = PlaceholderVehicle::with_data("Red Five", data);
            let geo = StaticGeo::new();
            let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
            assert_eq!(
                phrase,
                "Red Five is stopped. Available range is 100 miles."
            );
            assert!(!phrase.contains("heading"));
        }
    }

    #[test]
    fn done_charging_at_home() {
        let data = VehicleData {
            drive_state: Some(DriveState {
                shift_state: Some(ShiftState::Park),
                latitude: 37.44,
                longitude: -122.16,
                ..DriveState::default()
            }),
            charge_state: Some(charge(ChargingState::Complete, 210.0)),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new().with_duration(30);
        let home = home();
        let phrase = status_phrase(&car, &geo, Some(&home), "CA").unwrap();
        assert_eq!(
            phrase,
            "Red Five is done charging. Available range is 210 miles."
        );
    }

    #[test]
    fn supercharging_away_from_home() {
        let data = VehicleData {
            drive_state: Some(DriveState {
                shift_state: Some(ShiftState::Park),
                latitude: 39.52,
                longitude: -119.81,
                ..DriveState::default()
            }),
            charge_state: Some(ChargeState {
                charging_state: Some(ChargingState::Charging),
                time_to_full_charge: Some(0.5),
                fast_charger_present: true,
                battery_range: Some(95.2),
            }),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new().with_duration(5400).with_components(vec![
            component("Reno", "Reno", &["locality"]),
            component("Nevada", "NV", &["administrative_area_level_1"]),
        ]);
        let home = home();
        let phrase = status_phrase(&car, &geo, Some(&home), "CA").unwrap();
        assert_eq!(
            phrase,
            format!(
                "Red Five is {u}1h{c} and {u}30min{c} away on {a}Reno, NV{c} and \
                 supercharging with {u}30min{c} to go. Available range is 95 miles.",
                u = UNIT_OPEN,
                a = ADDR_OPEN,
                c = CLOSE
            )
        );
    }

    #[test]
    fn charging_at_home_has_no_location_clause() {
        let data = VehicleData {
            drive_state: Some(DriveState {
                shift_state: Some(ShiftState::Park),
                latitude: 37.44,
                longitude: -122.16,
                ..DriveState::default()
            }),
            charge_state: Some(ChargeState {
                charging_state: Some(ChargingState::Charging),
                time_to_full_charge: Some(2.4),
                fast_charger_present: false,
                battery_range: Some(180.0),
            }),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new().with_duration(10);
        let home = home();
        let phrase = status_phrase(&car, &geo, Some(&home), "CA").unwrap();
        assert_eq!(
            phrase,
            format!(
                "Red Five is charging with {}2h{} to go. Available range is 180 miles.",
                UNIT_OPEN, CLOSE
            )
        );
    }

    #[test]
    fn disconnected_at_home_is_unplugged() {
        let data = VehicleData {
            drive_state: Some(DriveState {
                shift_state: Some(ShiftState::Park),
                latitude: 37.44,
                longitude: -122.16,
                ..DriveState::default()
            }),
            charge_state: Some(charge(ChargingState::Disconnected, 210.0)),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new().with_duration(30);
        let home = home();
        let phrase = status_phrase(&car, &geo, Some(&home), "CA").unwrap();
        assert_eq!(
            phrase,
            "Red Five is unplugged. Available range is 210 miles."
        );
    }

    #[test]
    fn stopped_charge_away_is_ready_to_charge() {
        let data = VehicleData {
            drive_state: Some(DriveState {
                shift_state: Some(ShiftState::Park),
                latitude: 39.52,
                longitude: -119.81,
                ..DriveState::default()
            }),
            charge_state: Some(charge(ChargingState::Stopped, 150.0)),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new().with_components(vec![
            component("Reno", "Reno", &["locality"]),
            component("Nevada", "NV", &["administrative_area_level_1"]),
        ]);
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert_eq!(
            phrase,
            format!(
                "Red Five is plugged in and ready to charge on {}Reno, NV{}. \
                 Available range is 150 miles.",
                ADDR_OPEN, CLOSE
            )
        );
    }

    #[test]
    fn unrecognized_charging_state_is_spoken_raw() {
        let data = VehicleData {
            drive_state: None,
            charge_state: Some(charge(
                ChargingState::Other("NoPower".to_string()),
                77.0,
            )),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new();
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert_eq!(
            phrase,
            "Charging state is NoPower. Available range is 77 miles."
        );
    }

    #[test]
    fn range_is_truncated_not_rounded() {
        let data = VehicleData {
            drive_state: None,
            charge_state: Some(charge(ChargingState::Disconnected, 142.9)),
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new();
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert!(phrase.ends_with("Available range is 142 miles."));
    }

    #[test]
    fn missing_charge_state_degrades_to_parked() {
        let data = VehicleData {
            drive_state: None,
            charge_state: None,
        };
        let car = PlaceholderVehicle::with_data("Red Five", data);
        let geo = StaticGeo::new();
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert_eq!(phrase, "Red Five is parked.");
    }

    #[test]
    fn sleeping_vehicle_wakes_once_and_apologizes() {
        let car = PlaceholderVehicle::new("Red Five");
        let geo = StaticGeo::new();
        let phrase = status_phrase(&car, &geo, None, "CA").unwrap();
        assert_eq!(
            phrase,
            "Red Five was sleeping. Wait a moment and try again."
        );
        assert_eq!(car.wake_calls(), 1);
    }
}
