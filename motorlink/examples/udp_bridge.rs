//! Talk to a motor through a UDP coordinator bridge

use std::time::Duration;

use motorlink::Motor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    // Change to your bridge address
    let ip = std::env::var("BRIDGE_IP").unwrap_or_else(|_| "192.168.1.50".to_string());
    let port = std::env::var("BRIDGE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(motorlink_transport::DEFAULT_PORT);

    println!("Connecting to {}:{} via UDP...", ip, port);

    let mut motor = Motor::udp(ip, port).with_timeout(Duration::from_secs(3));
    motor.connect().await?;
    println!("✓ Connected!");

    // KEY=VALUE pairs from the command line, e.g. `state=OPEN speed=200`
    for arg in std::env::args().skip(1) {
        let Some((key, value)) = arg.split_once('=') else {
            anyhow::bail!("expected KEY=VALUE, got {arg:?}");
        };
        motor.set(key, value).await?;
        println!("✓ Set {} = {}", key, value);
    }

    for key in ["position", "calibrated", "speed"] {
        motor.get(key).await?;
        match motor.poll().await {
            Ok(Some(update)) => println!("✓ {}: {:?}", key, update),
            Ok(None) => println!("✗ {}: corrupted report dropped", key),
            Err(e) => println!("✗ {}: {}", key, e),
        }
    }

    println!("✓ State: {}", motor.state());

    motor.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
