//! cluster-telemetry - synthetic vehicle telemetry for an instrument cluster.
//!
//! `simulator` advances one `VehicleState` per tick; `host` owns the live
//! record, ticks it on a timer and republishes JSON snapshots to renderers.

pub mod config;
pub mod error;
pub mod host;
pub mod indicators;
pub mod random;
pub mod simulator;
pub mod state;

pub use config::HostConfig;
pub use error::{ConfigError, HostError};
pub use host::ClusterHost;
pub use indicators::ClusterIndicators;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use simulator::{step, TelemetrySimulator, TickSamples, SAMPLES_PER_TICK, TICK_SECONDS};
pub use state::{Gear, Snapshot, VehicleState};
