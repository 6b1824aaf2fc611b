//! Scheduler lifecycle behavior over in-memory stores.

mod common;

use std::sync::Arc;
use std::time::Duration;

use bentahan_core::listing::{STATUS_ACTIVE, STATUS_EXPIRED};
use bentahan_engine::{
    EngineConfig, ExpirationScheduler, LifecycleEvent, LifecycleSignal, Reconciler,
};

use common::{stores, MemoryStore};

fn fast_config() -> EngineConfig {
    EngineConfig {
        poll_interval: Duration::from_millis(25),
        initial_delay: Duration::from_millis(10),
        foreground_debounce: Duration::from_millis(200),
        ..EngineConfig::default()
    }
}

/// Config whose timer effectively never fires, isolating foreground
/// behavior.
fn timer_idle_config() -> EngineConfig {
    EngineConfig {
        poll_interval: Duration::from_secs(600),
        initial_delay: Duration::from_secs(600),
        foreground_debounce: Duration::from_millis(200),
        ..EngineConfig::default()
    }
}

fn scheduler(store: &Arc<MemoryStore>, config: EngineConfig) -> (ExpirationScheduler, Arc<LifecycleSignal>) {
    let lifecycle = Arc::new(LifecycleSignal::default());
    let reconciler = Arc::new(Reconciler::new(stores(store), config.clone()));
    (
        ExpirationScheduler::new(reconciler, Arc::clone(&lifecycle), config),
        lifecycle,
    )
}

#[tokio::test]
async fn periodic_tick_settles_expired_listing() {
    let store = MemoryStore::new();
    let listing = store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, _lifecycle) = scheduler(&store, fast_config());
    scheduler.start();

    tokio::time::sleep(Duration::from_millis(150)).await;
    scheduler.stop();

    assert_eq!(store.listing(listing).status, STATUS_EXPIRED);
}

#[tokio::test]
async fn start_is_idempotent() {
    let store = MemoryStore::new();
    store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, _lifecycle) = scheduler(&store, timer_idle_config());
    scheduler.start();
    scheduler.start();
    assert!(scheduler.status().running);

    scheduler.stop();
    assert!(!scheduler.status().running);
}

#[tokio::test]
async fn stop_is_idempotent_and_safe_when_not_running() {
    let store = MemoryStore::new();
    let (scheduler, _lifecycle) = scheduler(&store, timer_idle_config());

    // Never started.
    scheduler.stop();
    assert!(!scheduler.status().running);

    scheduler.start();
    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.status().running);
}

#[tokio::test]
async fn stop_prevents_further_sweeps() {
    let store = MemoryStore::new();
    store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, _lifecycle) = scheduler(&store, fast_config());
    scheduler.start();
    scheduler.stop();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.list_active_calls(), 0);
}

#[tokio::test]
async fn restart_after_stop_resumes_sweeping() {
    let store = MemoryStore::new();
    let listing = store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, _lifecycle) = scheduler(&store, fast_config());
    scheduler.start();
    scheduler.stop();

    scheduler.start();
    tokio::time::sleep(Duration::from_millis(150)).await;
    scheduler.stop();

    assert_eq!(store.listing(listing).status, STATUS_EXPIRED);
}

#[tokio::test]
async fn foreground_event_triggers_immediate_sweep() {
    let store = MemoryStore::new();
    let listing = store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, lifecycle) = scheduler(&store, timer_idle_config());
    scheduler.start();

    // Let the task subscribe and park in select before publishing.
    tokio::time::sleep(Duration::from_millis(20)).await;
    lifecycle.publish(LifecycleEvent::Foreground);
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop();

    assert_eq!(store.listing(listing).status, STATUS_EXPIRED);
}

#[tokio::test]
async fn foreground_events_are_debounced() {
    let store = MemoryStore::new();
    store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, lifecycle) = scheduler(&store, timer_idle_config());
    scheduler.start();
    tokio::time::sleep(Duration::from_millis(20)).await;

    lifecycle.publish(LifecycleEvent::Foreground);
    tokio::time::sleep(Duration::from_millis(30)).await;
    lifecycle.publish(LifecycleEvent::Foreground);
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop();

    // Second event fell inside the debounce window: exactly one sweep ran.
    assert_eq!(store.list_active_calls(), 1);
}

#[tokio::test]
async fn background_events_do_not_trigger_sweeps() {
    let store = MemoryStore::new();
    store.add_expired_listing(10, "Vintage camera", 1);

    let (scheduler, lifecycle) = scheduler(&store, timer_idle_config());
    scheduler.start();
    tokio::time::sleep(Duration::from_millis(20)).await;

    lifecycle.publish(LifecycleEvent::Background);
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop();

    assert_eq!(store.list_active_calls(), 0);
    assert_eq!(store.listing(1).status, STATUS_ACTIVE);
}

#[tokio::test]
async fn status_reports_interval_and_flags() {
    let store = MemoryStore::new();
    let config = timer_idle_config();
    let (scheduler, _lifecycle) = scheduler(&store, config.clone());

    let status = scheduler.status();
    assert!(!status.running);
    assert!(!status.sweep_in_flight);
    assert_eq!(status.poll_interval, config.poll_interval);

    scheduler.start();
    assert!(scheduler.status().running);
    scheduler.stop();
}
