//! Cross-crate lifecycle scenarios, driven end to end through the real
//! trampoline and the global callback registry.

use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use vireo_sdk::{
    AccelerometerSensor, Layout, List, NativeHandle, NativeStatus, OrientationSensor, SensorKind,
    SensorRuntime, WidgetRuntime,
};
use vireo_sensor::testing::FakeSensorRuntime;
use vireo_ui::testing::FakeWidgetRuntime;

fn orientation() -> (OrientationSensor, Arc<FakeSensorRuntime>) {
    let runtime = FakeSensorRuntime::supporting(&[SensorKind::Orientation]);
    let sensor = OrientationSensor::new(Arc::clone(&runtime) as Arc<dyn SensorRuntime>).unwrap();
    (sensor, runtime)
}

#[test]
fn test_listener_acquire_release_sequence() {
    let (sensor, runtime) = orientation();

    // subscribe-data acquires ...
    let data = sensor.on_data(|_| {}).unwrap();
    assert_eq!(runtime.created_listeners(), 1);

    // ... subscribe-accuracy reuses ...
    let accuracy = sensor.on_accuracy_changed(|_| {}).unwrap();
    assert_eq!(runtime.created_listeners(), 1);

    // ... unsubscribe-data keeps it ...
    sensor.unsubscribe_data(data).unwrap();
    assert_eq!(runtime.destroyed_listeners(), 0);

    // ... unsubscribe-accuracy releases it.
    sensor.unsubscribe_accuracy(accuracy).unwrap();
    assert_eq!(runtime.destroyed_listeners(), 1);
    assert!(!sensor.is_listening());
}

#[test]
fn test_data_and_accuracy_racing_first_subscription_acquire_once() {
    for _ in 0..50 {
        let (sensor, runtime) = orientation();
        let sensor = Arc::new(sensor);
        let barrier = Arc::new(Barrier::new(2));

        let data_side = {
            let sensor = Arc::clone(&sensor);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                sensor.on_data(|_| {}).unwrap();
            })
        };
        let accuracy_side = {
            let sensor = Arc::clone(&sensor);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                sensor.on_accuracy_changed(|_| {}).unwrap();
            })
        };
        data_side.join().unwrap();
        accuracy_side.join().unwrap();

        assert_eq!(runtime.created_listeners(), 1);
        assert!(sensor.is_listening());
    }
}

#[test]
fn test_orientation_stream_end_to_end() {
    let (sensor, runtime) = orientation();
    let seen = Arc::new(Mutex::new(Vec::new()));

    // Two subscribers, subscription order preserved per event.
    let sink = Arc::clone(&seen);
    sensor.on_data(move |data| sink.lock().unwrap().push(("first", data))).unwrap();
    let sink = Arc::clone(&seen);
    sensor.on_data(move |data| sink.lock().unwrap().push(("second", data))).unwrap();

    runtime.emit_sample(SensorKind::Orientation, 0, &[1.0, 2.0, 3.0], 100);

    let delivered = seen.lock().unwrap().clone();
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[0].0, "first");
    assert_eq!(delivered[1].0, "second");
    for (_, data) in &delivered {
        assert_eq!(data.azimuth, 1.0);
        assert_eq!(data.pitch, 2.0);
        assert_eq!(data.roll, 3.0);
        assert_eq!(data.timestamp, Duration::from_micros(100));
    }
    assert_eq!(sensor.reading().unwrap(), delivered[0].1);
}

#[test]
fn test_transient_acquire_failure_then_retry() {
    let (sensor, runtime) = orientation();
    runtime.fail_next_create(NativeStatus::TRY_AGAIN);

    let err = sensor.on_data(|_| {}).unwrap_err();
    assert!(err.is_transient());
    assert!(!sensor.is_listening());

    let id = sensor.on_data(|_| {}).unwrap();
    assert!(sensor.is_listening());
    sensor.unsubscribe_data(id).unwrap();
}

#[test]
fn test_sensors_and_widgets_share_the_process_registry() {
    let sensor_runtime =
        FakeSensorRuntime::supporting(&[SensorKind::Orientation, SensorKind::Accelerometer]);
    let widget_runtime = FakeWidgetRuntime::new();

    let orientation =
        OrientationSensor::new(Arc::clone(&sensor_runtime) as Arc<dyn SensorRuntime>).unwrap();
    let accelerometer =
        AccelerometerSensor::new(Arc::clone(&sensor_runtime) as Arc<dyn SensorRuntime>).unwrap();
    let list = List::from_handle(
        NativeHandle::from_raw(0x9000).unwrap(),
        widget_runtime.clone() as Arc<dyn WidgetRuntime>,
    );

    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    orientation.on_data(move |_| sink.lock().unwrap().push("orientation")).unwrap();
    let sink = Arc::clone(&log);
    accelerometer.on_data(move |_| sink.lock().unwrap().push("accelerometer")).unwrap();
    let sink = Arc::clone(&log);
    list.on_item_selected(move |_| sink.lock().unwrap().push("selected")).unwrap();

    sensor_runtime.emit_sample(SensorKind::Accelerometer, 0, &[0.0, 9.8, 0.0], 1);
    widget_runtime.emit(list.handle(), List::SELECTED, 0x77 as *const std::ffi::c_void);
    sensor_runtime.emit_sample(SensorKind::Orientation, 0, &[1.0, 1.0, 1.0], 2);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["accelerometer", "selected", "orientation"]
    );

    // Disposing one consumer silences only that consumer.
    accelerometer.dispose().unwrap();
    assert!(!sensor_runtime.emit_sample(SensorKind::Accelerometer, 0, &[0.0, 0.0, 0.0], 3));
    assert!(sensor_runtime.emit_sample(SensorKind::Orientation, 0, &[2.0, 2.0, 2.0], 4));
}

#[test]
fn test_widget_dispose_disconnects_everything() {
    let runtime = FakeWidgetRuntime::new();
    let layout = Layout::from_handle(
        NativeHandle::from_raw(0x9100).unwrap(),
        runtime.clone() as Arc<dyn WidgetRuntime>,
    );
    let list = List::from_handle(
        NativeHandle::from_raw(0x9200).unwrap(),
        runtime.clone() as Arc<dyn WidgetRuntime>,
    );

    layout.on_language_changed(|| {}).unwrap();
    layout.on_theme_changed(|| {}).unwrap();
    list.on_item_selected(|_| {}).unwrap();
    list.on_item_activated(|_| {}).unwrap();
    assert_eq!(runtime.connected_count(), 4);

    layout.dispose().unwrap();
    list.dispose().unwrap();
    assert_eq!(runtime.connected_count(), 0);
}
