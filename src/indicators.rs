// src/indicators.rs
//
// Readouts every cluster skin derives from the same record: warning lamps,
// blinkers, bar-gauge segments and the odometer/trip text.

use serde::Serialize;
use std::fmt;

use crate::state::{ENGINE_TEMP_MAX, PERCENT_MAX, RPM_MAX, VehicleState};

pub const LOW_FUEL_PERCENT: f64 = 20.0;
pub const OVERHEAT_CELSIUS: f64 = 100.0;
pub const BAR_SEGMENTS: u8 = 10;

// ---------------------------------------------
// DOORS / TRUNK
// ---------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Closure {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
    Trunk,
}

impl Closure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Closure::FrontLeft => "FL",
            Closure::FrontRight => "FR",
            Closure::RearLeft => "RL",
            Closure::RearRight => "RR",
            Closure::Trunk => "trunk",
        }
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn open_closures(state: &VehicleState) -> Vec<Closure> {
    [
        (state.door_fl, Closure::FrontLeft),
        (state.door_fr, Closure::FrontRight),
        (state.door_rl, Closure::RearLeft),
        (state.door_rr, Closure::RearRight),
        (state.trunk, Closure::Trunk),
    ]
    .into_iter()
    .filter_map(|(open, closure)| open.then_some(closure))
    .collect()
}

// ---------------------------------------------
// DERIVED INDICATORS
// ---------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIndicators {
    pub low_fuel: bool,
    pub overheat: bool,
    pub seatbelt_warning: bool,
    pub engine_check: bool,
    pub parking_brake: bool,
    pub left_blinker: bool,     // hazard or left turn
    pub right_blinker: bool,    // hazard or right turn
    pub open_closures: Vec<Closure>,
    pub fuel_segments: u8,      // 0..=10
    pub temp_segments: u8,      // 0..=10
    pub rpm_segments: u8,       // 0..=10, tachometer bar
    pub odometer_readout: String,
    pub tripmeter_readout: String,
    pub range_readout: String,
}

impl ClusterIndicators {
    pub fn from_state(state: &VehicleState) -> Self {
        Self {
            low_fuel: state.fuel_level < LOW_FUEL_PERCENT,
            overheat: state.engine_temp > OVERHEAT_CELSIUS,
            seatbelt_warning: !state.seatbelt,
            engine_check: state.engine_check,
            parking_brake: state.hand_brake,
            left_blinker: state.hazard_lights || state.turn_signal_left,
            right_blinker: state.hazard_lights || state.turn_signal_right,
            open_closures: open_closures(state),
            fuel_segments: segments(state.fuel_level, PERCENT_MAX),
            temp_segments: segments(state.engine_temp, ENGINE_TEMP_MAX),
            rpm_segments: segments(state.rpm, RPM_MAX),
            odometer_readout: odometer_readout(state.odometer),
            tripmeter_readout: tripmeter_readout(state.tripmeter),
            range_readout: range_readout(state.range),
        }
    }

    pub fn door_ajar(&self) -> bool {
        !self.open_closures.is_empty()
    }
}

/// Lit segments of a ten-segment bar for `value` out of `full_scale`.
pub fn segments(value: f64, full_scale: f64) -> u8 {
    if !value.is_finite() || full_scale <= 0.0 {
        return 0;
    }
    let lit = (value / full_scale * f64::from(BAR_SEGMENTS)).round();
    lit.clamp(0.0, f64::from(BAR_SEGMENTS)) as u8
}

/// Whole kilometres, zero-padded to six digits.
pub fn odometer_readout(km: f64) -> String {
    format!("{:06}", km.max(0.0).round() as u64)
}

pub fn tripmeter_readout(km: f64) -> String {
    format!("{:.1}", km.max(0.0))
}

/// Remaining range in whole kilometres.
pub fn range_readout(km: f64) -> String {
    format!("{}", km.max(0.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_record_warnings() {
        let ind = ClusterIndicators::from_state(&VehicleState::initial());
        assert!(!ind.low_fuel);
        assert!(!ind.overheat);
        assert!(ind.seatbelt_warning);
        assert!(ind.parking_brake);
        assert!(!ind.left_blinker && !ind.right_blinker);
        assert!(!ind.door_ajar());
        assert_eq!(ind.fuel_segments, 8);
        assert_eq!(ind.temp_segments, 8);
        assert_eq!(ind.rpm_segments, 1);
        assert_eq!(ind.odometer_readout, "123456");
        assert_eq!(ind.tripmeter_readout, "123.4");
        assert_eq!(ind.range_readout, "450");
    }

    #[test]
    fn tachometer_bar_follows_rpm() {
        let redline = VehicleState { rpm: 8000.0, ..VehicleState::initial() };
        assert_eq!(ClusterIndicators::from_state(&redline).rpm_segments, 10);

        let cruising = VehicleState { rpm: 3900.0, ..VehicleState::initial() };
        assert_eq!(ClusterIndicators::from_state(&cruising).rpm_segments, 5);
    }

    #[test]
    fn thresholds_are_strict() {
        let at_limits = VehicleState {
            fuel_level: 20.0,
            engine_temp: 100.0,
            ..VehicleState::initial()
        };
        let ind = ClusterIndicators::from_state(&at_limits);
        assert!(!ind.low_fuel);
        assert!(!ind.overheat);

        let past = VehicleState {
            fuel_level: 19.9,
            engine_temp: 100.1,
            ..VehicleState::initial()
        };
        let ind = ClusterIndicators::from_state(&past);
        assert!(ind.low_fuel);
        assert!(ind.overheat);
    }

    #[test]
    fn hazards_light_both_blinkers() {
        let s = VehicleState { hazard_lights: true, ..VehicleState::initial() };
        let ind = ClusterIndicators::from_state(&s);
        assert!(ind.left_blinker && ind.right_blinker);

        let s = VehicleState { turn_signal_right: true, ..VehicleState::initial() };
        let ind = ClusterIndicators::from_state(&s);
        assert!(!ind.left_blinker && ind.right_blinker);
    }

    #[test]
    fn lists_open_closures_in_order() {
        let s = VehicleState {
            door_rr: true,
            door_fl: true,
            trunk: true,
            ..VehicleState::initial()
        };
        assert_eq!(
            open_closures(&s),
            vec![Closure::FrontLeft, Closure::RearRight, Closure::Trunk]
        );
    }

    #[test]
    fn segments_round_and_saturate() {
        assert_eq!(segments(0.0, 100.0), 0);
        assert_eq!(segments(4.9, 100.0), 0);
        assert_eq!(segments(5.1, 100.0), 1);
        assert_eq!(segments(100.0, 100.0), 10);
        assert_eq!(segments(120.0, 120.0), 10);
        assert_eq!(segments(500.0, 100.0), 10);
        assert_eq!(segments(f64::NAN, 100.0), 0);
    }

    #[test]
    fn readouts() {
        assert_eq!(odometer_readout(42.6), "000043");
        assert_eq!(odometer_readout(1_234_567.0), "1234567");
        assert_eq!(tripmeter_readout(7.26), "7.3");
        assert_eq!(tripmeter_readout(0.0), "0.0");
        assert_eq!(range_readout(449.94), "450");
        assert_eq!(range_readout(12.3), "12");
        assert_eq!(range_readout(0.0), "0");
    }
}
