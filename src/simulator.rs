// ==============================================================================
// simulator.rs — SYNTHETIC VEHICLE TELEMETRY (one tick = 1.5 s of driving)
// ==============================================================================
// Advances a complete VehicleState by one tick:
// 1) Speed: park/neutral/handbrake decay, otherwise a biased random walk
// 2) RPM: recomputed from speed every tick (no inertia)
// 3) Power: rpm ratio * speed ratio, zero below rolling speed
// 4) Distance: odometer/tripmeter up, range down (20% over raw distance)
// 5) Fuel: flat burn per tick
// 6) Engine temperature: drifts up above 80 km/h, down otherwise
// 7) Signals: engine check latch, handbrake auto-release, beam toggles
//
// Every numeric output is clamped into its range. Non-finite inputs are read
// as the lower bound of their range, so a bad record heals within one tick.
//
// Randomness comes from a RandomSource. Each tick draws exactly
// SAMPLES_PER_TICK samples in the order of TickSamples' fields, whether or not
// the branch that uses them is taken.
// ==============================================================================

use crate::random::{RandomSource, SeededRandom};
use crate::state::{
    ENGINE_TEMP_MAX, ENGINE_TEMP_MIN, PERCENT_MAX, PERCENT_MIN, RPM_IDLE, RPM_MAX, SPEED_MAX,
    SPEED_MIN, VehicleState,
};

/// Simulated seconds covered by one tick.
pub const TICK_SECONDS: f64 = 1.5;

/// Uniform samples consumed per tick.
pub const SAMPLES_PER_TICK: usize = 7;

// --- speed ---
const PARKED_DECEL: f64 = 10.0;        // km/h per tick
const SPEED_BIAS: f64 = 0.4;           // (u - 0.4) * 15 => [-6, +9)
const SPEED_SPAN: f64 = 15.0;

// --- rpm ---
const ROLLING_SPEED: f64 = 5.0;        // km/h, below this the engine idles
const RPM_DRIVE_BASE: f64 = 900.0;
const RPM_DRIVE_SPAN: f64 = 6000.0;
const RPM_DRIVE_JITTER: f64 = 400.0;   // ±200
const RPM_IDLE_JITTER: f64 = 100.0;    // ±50

// --- power ---
const POWER_NOISE: f64 = 5.0;          // %

// --- distance / fuel ---
const SECONDS_PER_HOUR: f64 = 3600.0;
const RANGE_FACTOR: f64 = 1.2;
const FUEL_BURN_PER_TICK: f64 = 0.02;  // percentage points

// --- thermal ---
const HOT_SPEED: f64 = 80.0;           // km/h
const HEAT_RATE: f64 = 0.2;            // °C per tick, max
const COOL_RATE: f64 = 0.1;            // °C per tick, max

// --- signals ---
const HANDBRAKE_RELEASE_SPEED: f64 = 1.0;
const ENGINE_CHECK_ROLL: f64 = 0.998;
const HIGH_BEAM_ROLL: f64 = 0.99;
const LOW_BEAM_ROLL: f64 = 0.98;

// ====================================================================
// Per-tick random draws
// ====================================================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSamples {
    pub speed: f64,
    pub rpm: f64,
    pub power: f64,
    pub thermal: f64,
    pub engine_check: f64,
    pub high_beam: f64,
    pub low_beam: f64,
}

impl TickSamples {
    pub fn draw<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self {
            speed: rng.next_unit(),
            rpm: rng.next_unit(),
            power: rng.next_unit(),
            thermal: rng.next_unit(),
            engine_check: rng.next_unit(),
            high_beam: rng.next_unit(),
            low_beam: rng.next_unit(),
        }
    }

    /// Every sample forced into `[0, 1)`; NaN reads as 0.
    pub fn to_unit_interval(&self) -> Self {
        Self {
            speed: unit(self.speed),
            rpm: unit(self.rpm),
            power: unit(self.power),
            thermal: unit(self.thermal),
            engine_check: unit(self.engine_check),
            high_beam: unit(self.high_beam),
            low_beam: unit(self.low_beam),
        }
    }
}

#[inline]
fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0 - f64::EPSILON) }
}

// ====================================================================
// Simulator
// ====================================================================
#[derive(Debug, Clone)]
pub struct TelemetrySimulator<R: RandomSource = SeededRandom> {
    rng: R,
}

impl<R: RandomSource> TelemetrySimulator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Produce the record for the next tick. `prev` is left untouched.
    pub fn advance(&mut self, prev: &VehicleState) -> VehicleState {
        let samples = TickSamples::draw(&mut self.rng);
        step(prev, &samples)
    }
}

// ====================================================================
// Pure update rule
// ====================================================================
pub fn step(prev: &VehicleState, samples: &TickSamples) -> VehicleState {
    let u = samples.to_unit_interval();

    // -------------------------
    // SPEED
    // -------------------------
    let prev_speed = finite_or(prev.speed, SPEED_MIN);
    let speed = if prev.hand_brake || prev.gear.is_disengaged() {
        (prev_speed - PARKED_DECEL).max(SPEED_MIN)
    } else {
        prev_speed + (u.speed - SPEED_BIAS) * SPEED_SPAN
    };
    let speed = speed.clamp(SPEED_MIN, SPEED_MAX);

    // -------------------------
    // RPM (function of speed)
    // -------------------------
    let rpm = if speed > ROLLING_SPEED {
        RPM_DRIVE_BASE + (speed / SPEED_MAX) * RPM_DRIVE_SPAN + (u.rpm - 0.5) * RPM_DRIVE_JITTER
    } else {
        RPM_IDLE + (u.rpm - 0.5) * RPM_IDLE_JITTER
    };
    let rpm = rpm.clamp(RPM_IDLE, RPM_MAX);

    // -------------------------
    // POWER
    // -------------------------
    let power_output = if speed < ROLLING_SPEED {
        0.0
    } else {
        ((rpm / RPM_MAX) * (speed / SPEED_MAX) * 100.0 + u.power * POWER_NOISE)
            .clamp(PERCENT_MIN, PERCENT_MAX)
    };

    // -------------------------
    // DISTANCE
    // -------------------------
    let distance = speed / SECONDS_PER_HOUR * TICK_SECONDS;
    let odometer = finite_or(prev.odometer, 0.0) + distance;
    let tripmeter = finite_or(prev.tripmeter, 0.0) + distance;
    let range = (finite_or(prev.range, 0.0) - distance * RANGE_FACTOR).max(0.0);

    // -------------------------
    // FUEL (flat burn, independent of load)
    // -------------------------
    let fuel_level = (finite_or(prev.fuel_level, PERCENT_MIN) - FUEL_BURN_PER_TICK)
        .clamp(PERCENT_MIN, PERCENT_MAX);

    // -------------------------
    // ENGINE TEMPERATURE
    // -------------------------
    let drift = if speed > HOT_SPEED { HEAT_RATE } else { -COOL_RATE };
    let engine_temp = (finite_or(prev.engine_temp, ENGINE_TEMP_MIN) + drift * u.thermal)
        .clamp(ENGINE_TEMP_MIN, ENGINE_TEMP_MAX);

    // -------------------------
    // SIGNALS
    // -------------------------
    let engine_check = prev.engine_check || u.engine_check > ENGINE_CHECK_ROLL;

    let hand_brake = if speed < HANDBRAKE_RELEASE_SPEED {
        prev.hand_brake
    } else {
        false
    };

    let high_beam = prev.high_beam ^ (u.high_beam > HIGH_BEAM_ROLL);
    // low beam holds off through any tick in which high beam is or was on
    let low_beam =
        !prev.high_beam && !high_beam && (prev.low_beam ^ (u.low_beam > LOW_BEAM_ROLL));

    VehicleState {
        speed,
        rpm,
        power_output,
        fuel_level,
        engine_temp,
        odometer,
        tripmeter,
        range,
        engine_check,
        hand_brake,
        high_beam,
        low_beam,
        outside_temp: finite_or(prev.outside_temp, 0.0),
        ..*prev
    }
}

#[inline]
fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}
