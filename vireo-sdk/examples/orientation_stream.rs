//! Orientation streaming - demonstrates the sensor subscription lifecycle
//!
//! Shows the reference-counted listener in action against the fake sensor
//! runtime: the first subscriber acquires the native listener, events fan
//! out to every subscriber in order, and dispose tears everything down.
//!
//! Run with: cargo run -p vireo-sdk --example orientation_stream

use std::sync::Arc;

use vireo_sdk::{OrientationSensor, SensorKind, SensorRuntime};
use vireo_sensor::testing::FakeSensorRuntime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vireo_bridge=debug".parse()?)
                .add_directive("vireo_sensor=debug".parse()?),
        )
        .init();

    println!("=== Orientation Stream ===\n");

    // A fake device with one orientation sensor; a real build would hand
    // the wrappers a runtime wrapping the platform's C sensor API instead.
    let runtime = FakeSensorRuntime::supporting(&[SensorKind::Orientation]);
    let sensor = OrientationSensor::new(Arc::clone(&runtime) as Arc<dyn SensorRuntime>)?;
    println!(
        "Bound {} sensor (listener acquired: {})",
        sensor.kind(),
        sensor.is_listening()
    );

    // First subscriber acquires the listener.
    let stream = sensor.on_data(|data| {
        println!(
            "  reading: azimuth {:6.1}°  pitch {:6.1}°  roll {:6.1}°  at {:?}",
            data.azimuth, data.pitch, data.roll, data.timestamp
        );
    })?;
    let accuracy = sensor.on_accuracy_changed(|change| {
        println!("  accuracy is now {} at {:?}", change.accuracy, change.timestamp);
    })?;
    println!("Subscribed (listener acquired: {})\n", sensor.is_listening());

    // Play a short synthetic stream through the real dispatch path.
    for step in 0u64..5 {
        let azimuth = 10.0 + step as f32 * 30.0;
        runtime.emit_sample(
            SensorKind::Orientation,
            0,
            &[azimuth, 2.5, -1.0],
            1_000 * (step + 1),
        );
    }
    runtime.emit_accuracy(SensorKind::Orientation, 0, 2, 6_000);

    if let Some(reading) = sensor.reading() {
        println!("\nCached last reading: azimuth {:.1}°", reading.azimuth);
    }

    // Last unsubscribe releases the listener again.
    sensor.unsubscribe_data(stream)?;
    sensor.unsubscribe_accuracy(accuracy)?;
    println!("Unsubscribed (listener acquired: {})", sensor.is_listening());

    sensor.dispose()?;
    println!("Disposed.");
    Ok(())
}
