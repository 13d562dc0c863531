//! Drive a simulated motor over the in-memory transport

use std::time::Duration;

use motorlink::{Calibration, Motor, SimulatedMotor};
use motorlink_transport::MemoryTransport;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG=motorlink=trace for byte dumps)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (transport, endpoint) = MemoryTransport::pair("simulated-motor");
    let device = tokio::spawn(SimulatedMotor::default().run(endpoint));

    let mut motor = Motor::new(transport).with_timeout(Duration::from_secs(1));
    motor.connect().await?;
    println!("✓ Connected!");

    motor.calibrate(Calibration::Closed).await?;
    motor.calibrate(Calibration::Opened).await?;
    motor.get("calibrated").await?;
    motor.poll().await?;

    motor.set("speed", "300").await?;
    motor.get("speed").await?;
    motor.poll().await?;

    for steps in [1600, -400] {
        motor.move_by(steps).await?;
        motor.get("position").await?;
        motor.poll().await?;
        println!("✓ Moved {} steps: {}", steps, motor.state());
    }

    motor.stop().await?;
    motor.poll().await?;
    println!("✓ Device said: {}", motor.state().last_action.as_deref().unwrap_or(""));

    motor.disconnect().await?;
    drop(motor);

    let sim = device.await??;
    println!("✓ Simulator finished at {}%", sim.position);

    Ok(())
}
