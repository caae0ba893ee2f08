// src/host.rs
//
// Owns the single live VehicleState, drives the simulator on a fixed cadence
// and republishes every complete snapshot to the subscribed renderers.

use std::future::Future;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::config::HostConfig;
use crate::error::HostError;
use crate::random::{RandomSource, SeededRandom};
use crate::simulator::TelemetrySimulator;
use crate::state::{Snapshot, VehicleState};

pub struct ClusterHost<R: RandomSource = SeededRandom> {
    session: Uuid,
    tick: u64,
    vehicle: VehicleState,
    simulator: TelemetrySimulator<R>,
    clients: Vec<UnboundedSender<String>>,
}

impl<R: RandomSource> ClusterHost<R> {
    /// New session seeded from the initial parked record.
    pub fn new(simulator: TelemetrySimulator<R>) -> Self {
        Self::with_state(simulator, VehicleState::initial())
    }

    pub fn with_state(simulator: TelemetrySimulator<R>, vehicle: VehicleState) -> Self {
        Self {
            session: Uuid::new_v4(),
            tick: 0,
            vehicle,
            simulator,
            clients: Vec::new(),
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn subscriber_count(&self) -> usize {
        self.clients.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session,
            tick: self.tick,
            vehicle: self.vehicle,
        }
    }

    /// Register a renderer. It receives the current snapshot right away.
    pub fn subscribe(&mut self) -> Result<UnboundedReceiver<String>, HostError> {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let json = self.snapshot().to_json()?;
        let _ = tx.send(json);

        self.clients.push(tx);
        debug!(subscribers = self.clients.len(), "renderer subscribed");
        Ok(rx)
    }

    /// Advance one tick and publish the result.
    pub fn tick(&mut self) -> Result<Snapshot, HostError> {
        let next = self.simulator.advance(&self.vehicle);
        self.tick += 1;
        log_transitions(self.tick, &self.vehicle, &next);
        self.vehicle = next;

        let snapshot = self.snapshot();
        self.broadcast_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Send a snapshot to all renderers, dropping the ones that went away.
    fn broadcast_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), HostError> {
        let json = snapshot.to_json()?;

        let before = self.clients.len();
        self.clients.retain(|tx| tx.send(json.clone()).is_ok());

        let dropped = before - self.clients.len();
        if dropped > 0 {
            debug!(dropped, remaining = self.clients.len(), "pruned closed renderers");
        }
        Ok(())
    }

    /// Tick on `config.tick_interval` until `shutdown` resolves or the tick
    /// limit is reached. Returns the last published state.
    pub async fn run<F>(
        mut self,
        config: &HostConfig,
        shutdown: F,
    ) -> Result<VehicleState, HostError>
    where
        F: Future<Output = ()>,
    {
        info!(
            session = %self.session,
            interval = ?config.tick_interval,
            max_ticks = ?config.max_ticks,
            "cluster host started"
        );

        let mut ticker = interval(config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick of a tokio interval fires immediately
        ticker.tick().await;

        tokio::pin!(shutdown);

        loop {
            if config.max_ticks.is_some_and(|max| self.tick >= max) {
                info!(ticks = self.tick, "tick limit reached");
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!(ticks = self.tick, "shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick()?;
                }
            }
        }

        Ok(self.vehicle)
    }
}

fn log_transitions(tick: u64, prev: &VehicleState, next: &VehicleState) {
    if !prev.engine_check && next.engine_check {
        warn!(tick, rpm = next.rpm, engine_temp = next.engine_temp, "engine check warning lit");
    }
    if prev.hand_brake && !next.hand_brake {
        info!(tick, speed = next.speed, "handbrake released");
    }
    if prev.fuel_level > 0.0 && next.fuel_level <= 0.0 {
        warn!(tick, odometer = next.odometer, "fuel exhausted");
    }
    if prev.range > 0.0 && next.range <= 0.0 {
        warn!(tick, odometer = next.odometer, "range exhausted");
    }
    if prev.high_beam != next.high_beam || prev.low_beam != next.low_beam {
        debug!(tick, high_beam = next.high_beam, low_beam = next.low_beam, "headlights changed");
    }

    trace!(
        tick,
        speed = next.speed,
        rpm = next.rpm,
        power = next.power_output,
        fuel = next.fuel_level,
        temp = next.engine_temp,
        "tick"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::state::Gear;

    fn host(sample: f64) -> ClusterHost<ScriptedRandom> {
        ClusterHost::new(TelemetrySimulator::new(ScriptedRandom::constant(sample)))
    }

    #[test]
    fn subscriber_gets_current_snapshot_first() {
        let mut host = host(0.5);
        let mut rx = host.subscribe().unwrap();

        let first: Snapshot = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(first.tick, 0);
        assert_eq!(first.session, host.session());
        assert_eq!(first.vehicle, VehicleState::initial());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn tick_replaces_state_and_publishes() {
        let mut host = host(0.5);
        let mut rx = host.subscribe().unwrap();
        let _ = rx.try_recv();

        let snap = host.tick().unwrap();
        assert_eq!(snap.tick, 1);
        assert_eq!(host.tick_count(), 1);
        assert_eq!(*host.vehicle(), snap.vehicle);

        let published: Snapshot = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(published.tick, 1);
        assert_eq!(published.vehicle, snap.vehicle);
    }

    #[test]
    fn closed_subscribers_are_pruned() {
        let mut host = host(0.5);
        let keep = host.subscribe().unwrap();
        let gone = host.subscribe().unwrap();
        assert_eq!(host.subscriber_count(), 2);

        drop(gone);
        host.tick().unwrap();
        assert_eq!(host.subscriber_count(), 1);
        drop(keep);
    }

    #[test]
    fn with_state_starts_from_given_record() {
        let start = VehicleState {
            speed: 60.0,
            gear: Gear::Drive,
            hand_brake: false,
            ..VehicleState::initial()
        };
        let mut host = ClusterHost::with_state(
            TelemetrySimulator::new(ScriptedRandom::constant(0.4)),
            start,
        );
        let snap = host.tick().unwrap();
        assert_eq!(snap.vehicle.speed, 60.0);
        assert!(snap.vehicle.odometer > start.odometer);
    }
}
