//! Smart signals - demonstrates widget event bridging
//!
//! Adopts fake layout and list widgets and routes their smart signals
//! through the bridge: one native connect per signal regardless of
//! subscriber count, item handles riding the payload pointer, and
//! idempotent dispose.
//!
//! Run with: cargo run -p vireo-sdk --example smart_signals

use std::ffi::c_void;
use std::sync::Arc;

use vireo_sdk::{Layout, List, NativeHandle, WidgetRuntime};
use vireo_ui::testing::FakeWidgetRuntime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vireo_bridge=debug".parse()?)
                .add_directive("vireo_ui=debug".parse()?),
        )
        .init();

    println!("=== Smart Signals ===\n");

    let runtime = FakeWidgetRuntime::new();
    let layout_handle = NativeHandle::from_raw(0xA100).expect("nonzero");
    let list_handle = NativeHandle::from_raw(0xA200).expect("nonzero");

    let layout = Layout::from_handle(layout_handle, runtime.clone() as Arc<dyn WidgetRuntime>);
    let list = List::from_handle(list_handle, runtime.clone() as Arc<dyn WidgetRuntime>);

    layout.on_language_changed(|| println!("  layout: language changed"))?;
    layout.on_theme_changed(|| println!("  layout: theme changed"))?;

    // Two subscribers to the same signal: still one native connect.
    list.on_item_selected(|item| println!("  list: item {} selected", item.item))?;
    list.on_item_selected(|item| println!("  list: (audit) selection of {}", item.item))?;
    list.on_item_long_pressed(|item| println!("  list: item {} long-pressed", item.item))?;
    println!("Native connects so far: {}\n", runtime.connect_count());

    // Emissions arrive the way the toolkit delivers them.
    runtime.emit(layout_handle, Layout::THEME_CHANGED, std::ptr::null());
    runtime.emit(list_handle, List::SELECTED, 0xBEE1 as *const c_void);
    runtime.emit(list_handle, List::LONG_PRESSED, 0xBEE2 as *const c_void);
    runtime.emit(layout_handle, Layout::LANGUAGE_CHANGED, std::ptr::null());

    layout.dispose()?;
    list.dispose()?;
    println!("\nDisposed; connected signals remaining: {}", runtime.connected_count());
    Ok(())
}
