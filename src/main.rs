use std::process::ExitCode;

use cluster_telemetry::{
    ClusterHost, ClusterIndicators, HostConfig, HostError, Snapshot, TelemetrySimulator,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "cluster host stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), HostError> {
    let config = HostConfig::from_env()?;
    if let Some(seed) = config.seed {
        info!(seed, "using fixed seed");
    }

    let mut host = ClusterHost::new(TelemetrySimulator::new(config.random_source()));

    // Log readout stands in for the gauge renderer
    tokio::spawn(log_readout(host.subscribe()?));

    let last = host.run(&config, shutdown_signal()).await?;

    info!(
        odometer = last.odometer,
        fuel = last.fuel_level,
        range = last.range,
        "session ended"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for ctrl-c; running until tick limit");
        std::future::pending::<()>().await;
    }
}

async fn log_readout(mut rx: UnboundedReceiver<String>) {
    while let Some(json) = rx.recv().await {
        let snap: Snapshot = match serde_json::from_str(&json) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "unreadable snapshot");
                continue;
            }
        };

        let v = &snap.vehicle;
        let ind = ClusterIndicators::from_state(v);
        info!(
            tick = snap.tick,
            gear = %v.gear,
            speed = format_args!("{:.0}", v.speed),
            rpm = format_args!("{:.0}", v.rpm),
            power = format_args!("{:.0}", v.power_output),
            fuel = format_args!("{:.2}", v.fuel_level),
            temp = format_args!("{:.1}", v.engine_temp),
            odo = %ind.odometer_readout,
            trip = %ind.tripmeter_readout,
            low_fuel = ind.low_fuel,
            overheat = ind.overheat,
            check_engine = ind.engine_check,
            "cluster"
        );
    }
}
