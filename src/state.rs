// src/state.rs

use serde::{Serialize, Deserialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------
// PHYSICAL BOUNDS
// ---------------------------------------------
pub const SPEED_MIN: f64 = 0.0;
pub const SPEED_MAX: f64 = 220.0;          // km/h
pub const RPM_IDLE: f64 = 800.0;           // rev/min, idle floor
pub const RPM_MAX: f64 = 8000.0;           // rev/min, redline
pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;
pub const ENGINE_TEMP_MIN: f64 = 70.0;     // °C
pub const ENGINE_TEMP_MAX: f64 = 120.0;    // °C

// ---------------------------------------------
// GEAR SELECTOR
// ---------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gear {
    #[default]
    #[serde(rename = "P")]
    Park,
    #[serde(rename = "R")]
    Reverse,
    #[serde(rename = "N")]
    Neutral,
    #[serde(rename = "D")]
    Drive,
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
    #[serde(rename = "4")]
    Fourth,
}

impl Gear {
    pub const ALL: [Gear; 8] = [
        Gear::Park,
        Gear::Reverse,
        Gear::Neutral,
        Gear::Drive,
        Gear::First,
        Gear::Second,
        Gear::Third,
        Gear::Fourth,
    ];

    /// Label shown on the gear indicator.
    pub fn label(&self) -> &'static str {
        match self {
            Gear::Park => "P",
            Gear::Reverse => "R",
            Gear::Neutral => "N",
            Gear::Drive => "D",
            Gear::First => "1",
            Gear::Second => "2",
            Gear::Third => "3",
            Gear::Fourth => "4",
        }
    }

    /// Park and neutral transmit no drive to the wheels.
    pub fn is_disengaged(&self) -> bool {
        matches!(self, Gear::Park | Gear::Neutral)
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------
// VEHICLE RECORD
// ---------------------------------------------

/// One complete telemetry record. Replaced wholesale every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    pub speed: f64,             // km/h, 0..220
    pub rpm: f64,               // rev/min, 800..8000
    pub power_output: f64,      // %, 0..100
    pub fuel_level: f64,        // %, 0..100
    pub engine_temp: f64,       // °C, 70..120
    pub gear: Gear,

    pub hazard_lights: bool,
    pub engine_check: bool,
    pub hand_brake: bool,
    pub seatbelt: bool,
    pub high_beam: bool,
    pub low_beam: bool,
    pub turn_signal_left: bool,
    pub turn_signal_right: bool,

    pub odometer: f64,          // km
    pub tripmeter: f64,         // km
    pub range: f64,             // km left on current fuel
    pub outside_temp: f64,      // °C, exogenous

    #[serde(rename = "doorFL")]
    pub door_fl: bool,
    #[serde(rename = "doorFR")]
    pub door_fr: bool,
    #[serde(rename = "doorRL")]
    pub door_rl: bool,
    #[serde(rename = "doorRR")]
    pub door_rr: bool,
    pub trunk: bool,
}

impl VehicleState {
    /// Session start: idle, parked, handbrake on.
    pub fn initial() -> Self {
        Self {
            speed: 0.0,
            rpm: 800.0,
            power_output: 0.0,
            fuel_level: 75.0,
            engine_temp: 90.0,
            gear: Gear::Park,
            hazard_lights: false,
            engine_check: false,
            hand_brake: true,
            seatbelt: false,
            high_beam: false,
            low_beam: false,
            turn_signal_left: false,
            turn_signal_right: false,
            odometer: 123_456.0,
            tripmeter: 123.4,
            range: 450.0,
            outside_temp: 10.0,
            door_fl: false,
            door_fr: false,
            door_rl: false,
            door_rr: false,
            trunk: false,
        }
    }

    /// True when every bounded quantity is finite and inside its range.
    pub fn within_bounds(&self) -> bool {
        let in_range = |v: f64, lo: f64, hi: f64| v.is_finite() && v >= lo && v <= hi;

        in_range(self.speed, SPEED_MIN, SPEED_MAX)
            && in_range(self.rpm, RPM_IDLE, RPM_MAX)
            && in_range(self.power_output, PERCENT_MIN, PERCENT_MAX)
            && in_range(self.fuel_level, PERCENT_MIN, PERCENT_MAX)
            && in_range(self.engine_temp, ENGINE_TEMP_MIN, ENGINE_TEMP_MAX)
            && self.range.is_finite()
            && self.range >= 0.0
            && self.odometer.is_finite()
            && self.tripmeter.is_finite()
            && !(self.high_beam && self.low_beam)
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::initial()
    }
}

// ---------------------------------------------
// PUBLISHED SNAPSHOT
// ---------------------------------------------
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: Uuid,
    pub tick: u64,
    pub vehicle: VehicleState,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
